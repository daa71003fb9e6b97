//! Rate laws of the thrombin-generation model.
//!
//! Mass-action activations, Michaelis-Menten conversions by the tenase and
//! prothrombinase complexes, thrombin feedback on V, VIII and XI, and
//! inhibition by antithrombin, TFPI and activated protein C. Units are nM
//! and seconds.

use crate::network::KineticModifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    Tf,
    Vii,
    TfViia,
    Xii,
    Xiia,
    Xi,
    Xia,
    Ix,
    Ixa,
    Viii,
    Viiia,
    X,
    Xa,
    V,
    Va,
    Ii,
    Iia,
    Fbg,
    Fibrin,
    Xiii,
    Xiiia,
    At,
    Tfpi,
    Pc,
    Apc,
    Ps,
}

pub const N_SPECIES: usize = 26;

impl Species {
    pub const ALL: [Species; N_SPECIES] = [
        Species::Tf,
        Species::Vii,
        Species::TfViia,
        Species::Xii,
        Species::Xiia,
        Species::Xi,
        Species::Xia,
        Species::Ix,
        Species::Ixa,
        Species::Viii,
        Species::Viiia,
        Species::X,
        Species::Xa,
        Species::V,
        Species::Va,
        Species::Ii,
        Species::Iia,
        Species::Fbg,
        Species::Fibrin,
        Species::Xiii,
        Species::Xiiia,
        Species::At,
        Species::Tfpi,
        Species::Pc,
        Species::Apc,
        Species::Ps,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Species::Tf => "TF",
            Species::Vii => "VII",
            Species::TfViia => "TF_VIIa",
            Species::Xii => "XII",
            Species::Xiia => "XIIa",
            Species::Xi => "XI",
            Species::Xia => "XIa",
            Species::Ix => "IX",
            Species::Ixa => "IXa",
            Species::Viii => "VIII",
            Species::Viiia => "VIIIa",
            Species::X => "X",
            Species::Xa => "Xa",
            Species::V => "V",
            Species::Va => "Va",
            Species::Ii => "II",
            Species::Iia => "IIa",
            Species::Fbg => "Fbg",
            Species::Fibrin => "Fibrin",
            Species::Xiii => "XIII",
            Species::Xiiia => "XIIIa",
            Species::At => "AT",
            Species::Tfpi => "TFPI",
            Species::Pc => "PC",
            Species::Apc => "APC",
            Species::Ps => "PS",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Plasma species a factor-table id scales. Activated forms start at zero
    /// and have no mapping.
    pub fn from_factor_id(id: &str) -> Option<Self> {
        let species = match id {
            "F7" => Species::Vii,
            "F12" => Species::Xii,
            "F11" => Species::Xi,
            "F9" => Species::Ix,
            "F8" => Species::Viii,
            "F10" => Species::X,
            "F5" => Species::V,
            "F2" => Species::Ii,
            "FBG" => Species::Fbg,
            "F13" => Species::Xiii,
            "AT" => Species::At,
            "TFPI" => Species::Tfpi,
            "PC" => Species::Pc,
            "PS" => Species::Ps,
            _ => return None,
        };
        Some(species)
    }

    pub fn initial_nm(self) -> f64 {
        match self {
            Species::Vii => 10.0,
            Species::Xii => 375.0,
            Species::Xi => 30.0,
            Species::Ix => 90.0,
            Species::Viii => 0.7,
            Species::X => 170.0,
            Species::V => 20.0,
            Species::Ii => 1400.0,
            Species::Fbg => 9000.0,
            Species::Xiii => 70.0,
            Species::At => 3400.0,
            Species::Tfpi => 2.5,
            Species::Pc => 65.0,
            Species::Ps => 300.0,
            _ => 0.0,
        }
    }
}

/// Second-order constants in nM^-1 s^-1, first-order in s^-1.
#[derive(Debug, Clone, PartialEq)]
pub struct RateConstants {
    pub tf_viia_on: f64,
    pub tf_viia_off: f64,
    pub tfviia_x: f64,
    pub tfviia_ix: f64,
    pub xii_auto: f64,
    pub xiia_xi: f64,
    pub xia_ix: f64,
    pub tenase_x: f64,
    pub ptase_ii: f64,
    pub iia_fbg: f64,
    pub iia_xiii: f64,
    pub iia_v: f64,
    pub iia_viii: f64,
    pub iia_xi: f64,
    pub xa_v: f64,
    pub xa_viii: f64,
    pub xa_ii_basal: f64,
    pub at_iia: f64,
    pub at_xa: f64,
    pub at_ixa: f64,
    pub at_xia: f64,
    pub tfpi_xa: f64,
    pub tfpi_tfviia: f64,
    pub iia_pc: f64,
    pub apc_va: f64,
    pub apc_viiia: f64,
    pub km_tenase_x: f64,
    pub km_ptase_ii: f64,
    pub km_iia_fbg: f64,
}

impl RateConstants {
    pub fn default_v1() -> Self {
        Self {
            tf_viia_on: 1e-2,
            tf_viia_off: 1e-4,
            tfviia_x: 5e-4,
            tfviia_ix: 1e-4,
            xii_auto: 1e-5,
            xiia_xi: 5e-4,
            xia_ix: 1e-3,
            tenase_x: 1.0,
            ptase_ii: 10.0,
            iia_fbg: 0.1,
            iia_xiii: 0.05,
            iia_v: 0.5,
            iia_viii: 1.0,
            iia_xi: 0.01,
            xa_v: 0.01,
            xa_viii: 0.005,
            xa_ii_basal: 1e-4,
            at_iia: 1e-4,
            at_xa: 5e-5,
            at_ixa: 1e-5,
            at_xia: 5e-6,
            tfpi_xa: 1e-4,
            tfpi_tfviia: 5e-4,
            iia_pc: 1e-4,
            apc_va: 5e-3,
            apc_viiia: 1e-2,
            km_tenase_x: 160.0,
            km_ptase_ii: 210.0,
            km_iia_fbg: 7200.0,
        }
    }
}

impl Default for RateConstants {
    fn default() -> Self {
        Self::default_v1()
    }
}

/// Writes dy/dt into `dydt`. Negative state entries are read as zero.
pub fn derivatives(k: &RateConstants, m: &KineticModifiers, y: &[f64], dydt: &mut [f64]) {
    let c = |s: Species| y[s.idx()].max(0.0);

    let tf = c(Species::Tf);
    let vii = c(Species::Vii);
    let tf_viia = c(Species::TfViia);
    let xii = c(Species::Xii);
    let xiia = c(Species::Xiia);
    let xi = c(Species::Xi);
    let xia = c(Species::Xia);
    let ix = c(Species::Ix);
    let ixa = c(Species::Ixa);
    let viii = c(Species::Viii);
    let viiia = c(Species::Viiia);
    let x = c(Species::X);
    let xa = c(Species::Xa);
    let v = c(Species::V);
    let va = c(Species::Va);
    let ii = c(Species::Ii);
    let iia = c(Species::Iia);
    let fbg = c(Species::Fbg);
    let xiii = c(Species::Xiii);
    let at = c(Species::At);
    let tfpi = c(Species::Tfpi);
    let pc = c(Species::Pc);
    let apc = c(Species::Apc);

    let r_tfviia_form = k.tf_viia_on * tf * vii;
    let r_tfviia_diss = k.tf_viia_off * tf_viia;
    let r_tfviia_x = k.tfviia_x * tf_viia * x;
    let r_tfviia_ix = k.tfviia_ix * tf_viia * ix;

    let r_xii_auto = k.xii_auto * xii;
    let r_xiia_xi = k.xiia_xi * xiia * xi;
    let r_xia_ix = k.xia_ix * xia * ix;

    // VIIIa and Va act as saturating cofactors.
    let tenase = ixa * viiia / (1.0 + viiia);
    let r_tenase_x = k.tenase_x * tenase * x / (k.km_tenase_x + x);

    let xa_eff = xa * m.xa_inhibition;
    let ptase = xa_eff * va / (1.0 + va);
    let r_ptase_ii = k.ptase_ii * ptase * ii / (k.km_ptase_ii + ii);

    let iia_eff = iia * m.iia_inhibition;
    let r_iia_fbg = k.iia_fbg * iia_eff * fbg / (k.km_iia_fbg + fbg);
    let r_iia_xiii = k.iia_xiii * iia_eff * xiii;
    let r_iia_v = k.iia_v * iia_eff * v;
    let r_iia_viii = k.iia_viii * iia_eff * viii;
    let r_iia_xi = k.iia_xi * iia_eff * xi;

    let r_xa_v = k.xa_v * xa * v;
    let r_xa_viii = k.xa_viii * xa * viii;
    let r_xa_ii_basal = k.xa_ii_basal * xa * ii;

    let r_at_iia = k.at_iia * at * iia * m.at_factor;
    let r_at_xa = k.at_xa * at * xa * m.at_factor;
    let r_at_ixa = k.at_ixa * at * ixa * m.at_factor;
    let r_at_xia = k.at_xia * at * xia * m.at_factor;
    let r_tfpi_xa = k.tfpi_xa * tfpi * xa;
    let r_tfpi_tfviia = k.tfpi_tfviia * tfpi * tf_viia * xa;

    // Thrombomodulin is not modeled; raw thrombin activates protein C.
    let r_iia_pc = k.iia_pc * iia * pc;
    let r_apc_va = k.apc_va * apc * va;
    let r_apc_viiia = k.apc_viiia * apc * viiia;

    let mut set = |s: Species, value: f64| dydt[s.idx()] = value;

    set(Species::Tf, -r_tfviia_form + r_tfviia_diss);
    set(Species::Vii, -r_tfviia_form + r_tfviia_diss);
    set(Species::TfViia, r_tfviia_form - r_tfviia_diss - r_tfpi_tfviia);

    set(Species::Xii, -r_xii_auto);
    set(Species::Xiia, r_xii_auto);

    set(Species::Xi, -r_xiia_xi - r_iia_xi);
    set(Species::Xia, r_xiia_xi + r_iia_xi - r_at_xia);

    set(Species::Ix, -r_tfviia_ix - r_xia_ix);
    set(Species::Ixa, r_tfviia_ix + r_xia_ix - r_at_ixa);

    set(Species::Viii, -r_iia_viii - r_xa_viii);
    set(Species::Viiia, r_iia_viii + r_xa_viii - r_apc_viiia);

    set(Species::X, -r_tfviia_x - r_tenase_x);
    set(Species::Xa, r_tfviia_x + r_tenase_x - r_at_xa - r_tfpi_xa);

    set(Species::V, -r_iia_v - r_xa_v);
    set(Species::Va, r_iia_v + r_xa_v - r_apc_va);

    set(Species::Ii, -r_ptase_ii - r_xa_ii_basal);
    set(Species::Iia, r_ptase_ii + r_xa_ii_basal - r_at_iia);

    set(Species::Fbg, -r_iia_fbg);
    set(Species::Fibrin, r_iia_fbg);

    set(Species::Xiii, -r_iia_xiii);
    set(Species::Xiiia, r_iia_xiii);

    set(Species::At, -(r_at_iia + r_at_xa + r_at_ixa + r_at_xia));
    set(Species::Tfpi, -r_tfpi_xa - r_tfpi_tfviia);

    set(Species::Pc, -r_iia_pc);
    set(Species::Apc, r_iia_pc);
    set(Species::Ps, 0.0);
}
