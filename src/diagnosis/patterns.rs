//! Primary patterns, highest priority first.

use crate::diagnosis::{Diagnosis, Findings, Pathway, Probability, Rule, RuleInput};
use crate::labs::MixingTest;
use crate::scores::{Hit4TProbability, IsthCategory, isth};

pub const ISOLATED_D_DIMER: &str = "isolated_d_dimer";
pub const ISOLATED_TT: &str = "isolated_tt";

pub fn ordered() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NormalProfile),
        Box::new(IsolatedAptt),
        Box::new(IsolatedPt),
        Box::new(CombinedPtAptt),
        Box::new(PlateletDisorder),
        Box::new(IsolatedDDimer),
        Box::new(IsolatedTt),
        Box::new(IsolatedHypofibrinogenemia),
    ]
}

struct NormalProfile;

impl Rule for NormalProfile {
    fn name(&self) -> &'static str {
        "normal_profile"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.all_normal
    }

    fn apply(&self, _input: &RuleInput, out: &mut Findings) {
        out.classify("normal profile", Pathway::None);
    }
}

struct IsolatedAptt;

impl Rule for IsolatedAptt {
    fn name(&self) -> &'static str {
        "isolated_aptt"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.aptt_high && !input.flags.pt_high
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        out.classify("isolated aPTT prolongation", Pathway::Intrinsic);

        if input.meds.heparin {
            out.push(heparin_effect());
            out.recommend("Confirm with an anti-Xa level; repeat the aPTT off heparin before a factor work-up");
            return;
        }

        match input.mixing {
            MixingTest::Corrects => {
                for d in deficiency_differential(input.flags.bleeding_time_high) {
                    out.push(d);
                }
                out.recommend("Assay factors VIII, IX and XI; add VWF antigen and activity");
            }
            MixingTest::DoesNotCorrect => {
                for d in inhibitor_differential() {
                    out.push(d);
                }
                out.warn("Mixing test does not correct: a circulating inhibitor is likely");
                out.recommend("Screen for lupus anticoagulant (dRVVT) and titrate a factor VIII inhibitor (Bethesda assay)");
            }
            MixingTest::NotPerformed => {
                let union = deficiency_differential(input.flags.bleeding_time_high)
                    .into_iter()
                    .chain(inhibitor_differential());
                for d in union {
                    let downgraded = d.probability.downgrade();
                    out.push(d.with_probability(downgraded));
                }
                out.recommend("Perform a 1:1 mixing study to separate factor deficiency from an inhibitor");
            }
        }

        if input.meds.doac_iia {
            out.unshift_all(vec![dabigatran_effect(Probability::High)]);
        }
    }
}

fn deficiency_differential(bleeding_time_high: bool) -> Vec<Diagnosis> {
    let vwd = Diagnosis::new("von_willebrand_disease", "von Willebrand disease", Probability::Moderate)
        .describe("VWF carries factor VIII; low VWF shortens its half-life and impairs platelet adhesion")
        .factors(&["VWF", "F8"])
        .tests(&["VWF antigen", "VWF ristocetin cofactor activity", "Factor VIII activity"]);
    let hem_a = Diagnosis::new("hemophilia_a", "Hemophilia A", Probability::High)
        .describe("Factor VIII deficiency, X-linked")
        .factors(&["F8"])
        .tests(&["Factor VIII activity"]);
    let hem_b = Diagnosis::new("hemophilia_b", "Hemophilia B", Probability::Moderate)
        .describe("Factor IX deficiency, X-linked")
        .factors(&["F9"])
        .tests(&["Factor IX activity"]);
    let hem_c = Diagnosis::new("hemophilia_c", "Hemophilia C", Probability::Low)
        .describe("Factor XI deficiency, variable bleeding tendency")
        .factors(&["F11"])
        .tests(&["Factor XI activity"]);
    let f12 = Diagnosis::new("factor_xii_deficiency", "Factor XII deficiency", Probability::Low)
        .describe("Prolongs the aPTT without a bleeding tendency")
        .factors(&["F12"])
        .tests(&["Factor XII activity"]);

    if bleeding_time_high {
        vec![
            vwd.with_probability(Probability::High),
            hem_a.with_probability(Probability::Moderate),
            hem_b.with_probability(Probability::Low),
            hem_c,
            f12,
        ]
    } else {
        vec![hem_a, hem_b, hem_c, vwd, f12]
    }
}

fn inhibitor_differential() -> Vec<Diagnosis> {
    vec![
        Diagnosis::new(
            "antiphospholipid_syndrome",
            "Antiphospholipid syndrome (lupus anticoagulant)",
            Probability::High,
        )
        .describe("Phospholipid-dependent antibodies prolong the aPTT in vitro but carry a thrombotic risk")
        .tests(&["dRVVT", "Anticardiolipin antibodies", "Anti-beta2-glycoprotein I"]),
        Diagnosis::new("acquired_hemophilia", "Acquired hemophilia", Probability::Moderate)
            .describe("Autoantibody against factor VIII, often with sudden severe bleeding")
            .factors(&["F8"])
            .tests(&["Factor VIII activity", "Bethesda assay"]),
        Diagnosis::new("specific_factor_inhibitor", "Specific factor inhibitor", Probability::Low)
            .describe("Alloantibody against IX or XI, or an inhibitor after replacement therapy")
            .factors(&["F9", "F11"])
            .tests(&["Factor IX and XI activity", "Bethesda assay"]),
    ]
}

struct IsolatedPt;

impl Rule for IsolatedPt {
    fn name(&self) -> &'static str {
        "isolated_pt"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.pt_high && !input.flags.aptt_high
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        out.classify("isolated PT prolongation", Pathway::Extrinsic);

        let medication = medication_effects(input, false);
        if !medication.is_empty() {
            for d in medication {
                out.push(d);
            }
            return;
        }

        out.push(
            Diagnosis::new("factor_vii_deficiency", "Factor VII deficiency", Probability::Moderate)
                .describe("Inherited or acquired; VII is the only factor measured by the PT alone")
                .factors(&["F7"])
                .tests(&["Factor VII activity"]),
        );
        out.push(
            Diagnosis::new("early_vitamin_k_deficiency", "Early vitamin K deficiency", Probability::Moderate)
                .describe("VII has the shortest half-life of the vitamin K dependent factors and falls first")
                .factors(&["F7", "F10", "F9", "F2"])
                .tests(&["Factors II, VII, IX, X", "Repeat PT after vitamin K"]),
        );
        out.push(
            Diagnosis::new("early_liver_disease", "Early liver disease", Probability::Low)
                .describe("Reduced synthesis shows first in factor VII")
                .factors(&["F7"])
                .tests(&["Liver panel", "Factor V activity"]),
        );
    }
}

struct CombinedPtAptt;

impl Rule for CombinedPtAptt {
    fn name(&self) -> &'static str {
        "combined_pt_aptt"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.pt_high && input.flags.aptt_high
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        out.classify("combined PT and aPTT prolongation", Pathway::Common);
        let flags = &input.flags;

        if flags.fibrinogen_low && flags.platelets_low && flags.d_dimer_high {
            let score = isth::score(input.labs, input.calibration);
            let probability = match score.category {
                IsthCategory::Overt => Probability::High,
                IsthCategory::NonOvert => Probability::Moderate,
                IsthCategory::Unlikely => Probability::Low,
            };
            out.push(
                Diagnosis::new("dic", "Disseminated Intravascular Coagulation", probability)
                    .describe(&score.interpretation)
                    .factors(&["FBG", "PLT", "F5", "F8", "F2", "AT"])
                    .tests(&["Peripheral smear for schistocytes", "Antithrombin", "Repeat ISTH score"]),
            );
            if score.category == IsthCategory::Overt {
                out.warn("Overt DIC: treat the underlying cause and support with platelets, plasma or fibrinogen if bleeding");
            }
            out.recommend("Repeat platelets, PT, fibrinogen and D-dimer to follow the ISTH score");
            out.isth = Some(score);
        } else if flags.fibrinogen_low {
            out.push(fibrinogen_diagnosis(input.labs.fibrinogen));
            out.recommend("Replace with fibrinogen concentrate or cryoprecipitate if bleeding");
        } else {
            out.push(
                Diagnosis::new("liver_failure", "Liver failure", Probability::Moderate)
                    .describe("Global loss of hepatic synthesis, factor V included")
                    .factors(&["F2", "F5", "F7", "F9", "F10", "FBG"])
                    .tests(&["Factor V activity", "Liver panel"]),
            );
            out.push(
                Diagnosis::new("vitamin_k_deficiency", "Vitamin K deficiency", Probability::Moderate)
                    .describe("II, VII, IX and X fall while factor V is preserved")
                    .factors(&["F2", "F7", "F9", "F10"])
                    .tests(&["Factor V activity", "Repeat PT after vitamin K"]),
            );
            out.recommend("Measure factor V: low in liver failure, normal in vitamin K deficiency");
        }

        out.unshift_all(medication_effects(input, true));
    }
}

/// Graded by severity: <50, 50-100, 100-200 mg/dL.
fn fibrinogen_diagnosis(fibrinogen: f64) -> Diagnosis {
    let (id, name, probability) = if fibrinogen < 50.0 {
        ("afibrinogenemia", "Afibrinogenemia", Probability::High)
    } else if fibrinogen < 100.0 {
        ("severe_hypofibrinogenemia", "Severe hypofibrinogenemia", Probability::High)
    } else {
        ("hypofibrinogenemia", "Hypofibrinogenemia", Probability::Moderate)
    };
    Diagnosis::new(id, name, probability)
        .describe("Inherited deficiency, consumption or dilution")
        .factors(&["FBG"])
        .tests(&["Clauss fibrinogen", "Fibrinogen antigen", "Thrombin time"])
}

fn heparin_effect() -> Diagnosis {
    Diagnosis::new("heparin_effect", "Heparin effect", Probability::High)
        .describe("Antithrombin-mediated inhibition of thrombin and Xa")
        .factors(&["IIa", "F10a"])
        .tests(&["Anti-Xa level"])
}

fn dabigatran_effect(probability: Probability) -> Diagnosis {
    Diagnosis::new("dabigatran_effect", "Direct thrombin inhibitor effect (dabigatran)", probability)
        .describe("Direct thrombin inhibition prolongs aPTT and TT")
        .factors(&["IIa"])
        .tests(&["Diluted thrombin time", "Ecarin clotting time"])
}

/// Drug explanations for a prolonged PT. `combined` adds the aPTT-only agents.
fn medication_effects(input: &RuleInput, combined: bool) -> Vec<Diagnosis> {
    let meds = input.meds;
    let mut out = Vec::new();
    if meds.warfarin {
        let name = if combined { "Warfarin over-anticoagulation" } else { "Warfarin effect" };
        out.push(
            Diagnosis::new("warfarin_effect", name, Probability::High)
                .describe("Vitamin K antagonism lowers II, VII, IX and X")
                .factors(&["F2", "F7", "F9", "F10"])
                .tests(&["INR"]),
        );
    }
    if meds.doac_xa {
        out.push(
            Diagnosis::new("anti_xa_doac_effect", "Anti-Xa DOAC effect", Probability::High)
                .describe("Rivaroxaban or apixaban prolong the PT in a reagent-dependent way")
                .factors(&["F10a"])
                .tests(&["Drug-calibrated anti-Xa level"]),
        );
    }
    if meds.doac_iia {
        out.push(dabigatran_effect(Probability::Moderate));
    }
    if combined && meds.heparin {
        out.push(heparin_effect().with_probability(Probability::Moderate));
    }
    out
}

struct PlateletDisorder;

impl Rule for PlateletDisorder {
    fn name(&self) -> &'static str {
        "platelet_disorder"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.platelets_low || input.flags.bleeding_time_high
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        if input.flags.platelets_low {
            out.classify("thrombocytopenia", Pathway::Platelet);
            for d in thrombocytopenia_tier(input.labs.platelets) {
                out.push(d);
            }
            if input.meds.any_heparin() {
                let probability = match input.hit4t.as_ref().map(|s| s.probability) {
                    Some(Hit4TProbability::High) => Probability::High,
                    Some(Hit4TProbability::Intermediate) | None => Probability::Moderate,
                    Some(Hit4TProbability::Low) => Probability::Low,
                };
                out.unshift_all(vec![
                    Diagnosis::new("hit", "Heparin-induced thrombocytopenia (HIT)", probability)
                        .describe("Anti-PF4/heparin antibodies activate platelets; thrombotic, not hemorrhagic")
                        .factors(&["PLT"])
                        .tests(&["Anti-PF4/heparin ELISA", "Serotonin release assay"]),
                ]);
            }
            return;
        }

        out.classify("isolated bleeding time prolongation", Pathway::Platelet);
        if input.meds.antiplatelet {
            out.push(
                Diagnosis::new("antiplatelet_effect", "Antiplatelet drug effect", Probability::High)
                    .describe("Aspirin or P2Y12 inhibition of platelet aggregation")
                    .factors(&["PLT"]),
            );
            return;
        }
        out.push(
            Diagnosis::new("von_willebrand_disease", "von Willebrand disease", Probability::Moderate)
                .describe("Defective platelet adhesion with a normal count")
                .factors(&["VWF", "F8"])
                .tests(&["VWF antigen", "VWF ristocetin cofactor activity", "PFA-100"]),
        );
        out.push(
            Diagnosis::new("platelet_dysfunction", "Acquired platelet dysfunction", Probability::Moderate)
                .describe("Uremia, liver disease or drugs not on the medication list")
                .factors(&["PLT"])
                .tests(&["Platelet aggregation studies", "Renal function"]),
        );
        out.push(
            Diagnosis::new("inherited_platelet_disorder", "Inherited platelet function disorder", Probability::Low)
                .describe("Glanzmann thrombasthenia, Bernard-Soulier syndrome, storage pool disease")
                .factors(&["PLT"])
                .tests(&["Platelet aggregation studies", "Flow cytometry"]),
        );
    }
}

fn thrombocytopenia_tier(platelets: f64) -> Vec<Diagnosis> {
    if platelets < 20.0 {
        vec![
            Diagnosis::new("thrombocytopenia_critical", "Critical thrombocytopenia (<20 x10^3/uL)", Probability::High)
                .describe("Risk of spontaneous bleeding")
                .factors(&["PLT"])
                .tests(&["Peripheral smear", "Repeat count in citrate"]),
            Diagnosis::new("itp", "Immune thrombocytopenia (ITP)", Probability::Moderate)
                .factors(&["PLT"])
                .tests(&["Peripheral smear"]),
            Diagnosis::new("ttp", "Thrombotic thrombocytopenic purpura (TTP)", Probability::Moderate)
                .describe("Microangiopathy with schistocytes")
                .factors(&["PLT", "VWF"])
                .tests(&["ADAMTS13 activity", "LDH", "Haptoglobin"]),
            Diagnosis::new("marrow_failure", "Bone marrow failure or infiltration", Probability::Low)
                .factors(&["PLT"])
                .tests(&["Complete blood count", "Bone marrow biopsy"]),
        ]
    } else if platelets < 50.0 {
        vec![
            Diagnosis::new("thrombocytopenia_severe", "Severe thrombocytopenia (<50 x10^3/uL)", Probability::High)
                .describe("Bleeding with trauma or procedures")
                .factors(&["PLT"])
                .tests(&["Peripheral smear"]),
            Diagnosis::new("itp", "Immune thrombocytopenia (ITP)", Probability::Moderate)
                .factors(&["PLT"]),
            Diagnosis::new("drug_induced_thrombocytopenia", "Drug-induced thrombocytopenia", Probability::Moderate)
                .factors(&["PLT"])
                .tests(&["Medication review"]),
            Diagnosis::new("hypersplenism", "Hypersplenism", Probability::Low)
                .factors(&["PLT"])
                .tests(&["Abdominal ultrasound"]),
        ]
    } else if platelets < 100.0 {
        vec![
            Diagnosis::new("thrombocytopenia_moderate", "Moderate thrombocytopenia (<100 x10^3/uL)", Probability::High)
                .factors(&["PLT"])
                .tests(&["Peripheral smear"]),
            Diagnosis::new("drug_induced_thrombocytopenia", "Drug-induced thrombocytopenia", Probability::Moderate)
                .factors(&["PLT"])
                .tests(&["Medication review"]),
            Diagnosis::new("liver_disease_hypersplenism", "Liver disease with hypersplenism", Probability::Moderate)
                .factors(&["PLT"])
                .tests(&["Liver panel", "Abdominal ultrasound"]),
            Diagnosis::new("gestational_thrombocytopenia", "Gestational or dilutional thrombocytopenia", Probability::Low)
                .factors(&["PLT"]),
        ]
    } else {
        vec![
            Diagnosis::new("thrombocytopenia_mild", "Mild thrombocytopenia (<150 x10^3/uL)", Probability::Moderate)
                .factors(&["PLT"]),
            Diagnosis::new("pseudothrombocytopenia", "Pseudothrombocytopenia (EDTA clumping)", Probability::Moderate)
                .factors(&["PLT"])
                .tests(&["Repeat count in citrate"]),
            Diagnosis::new("viral_thrombocytopenia", "Viral or drug-related mild thrombocytopenia", Probability::Low)
                .factors(&["PLT"]),
        ]
    }
}

struct IsolatedDDimer;

impl Rule for IsolatedDDimer {
    fn name(&self) -> &'static str {
        ISOLATED_D_DIMER
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.d_dimer_high && !input.flags.tt_high && !input.flags.fibrinogen_low
    }

    fn apply(&self, _input: &RuleInput, out: &mut Findings) {
        out.classify("isolated D-dimer elevation", Pathway::None);
        out.warn("D-dimer is non-specific: an elevated value alone does not establish thrombosis");

        let differential = [
            ("venous_thromboembolism", "Venous thromboembolism", Probability::Moderate),
            ("infection_inflammation", "Infection or inflammation", Probability::Moderate),
            ("malignancy", "Malignancy", Probability::Low),
            ("post_operative", "Post-operative state or trauma", Probability::Low),
            ("pregnancy", "Pregnancy", Probability::Low),
            ("hepatic_disease", "Hepatic disease", Probability::Low),
            ("age_related", "Age-related elevation", Probability::Low),
        ];
        for (id, name, probability) in differential {
            out.push(Diagnosis::new(id, name, probability).factors(&["FIBRIN", "PLASMIN"]));
        }
        out.recommend("Apply a clinical pretest probability score (Wells) before imaging");
        out.recommend("Over age 50 use an age-adjusted cut-off (age x 10 ng/mL FEU)");
    }
}

struct IsolatedTt;

impl Rule for IsolatedTt {
    fn name(&self) -> &'static str {
        ISOLATED_TT
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.tt_high && !input.flags.fibrinogen_low
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        out.classify("isolated TT prolongation", Pathway::Common);
        if input.meds.heparin {
            out.push(heparin_effect());
            return;
        }
        if input.meds.doac_iia {
            out.push(dabigatran_effect(Probability::High));
            return;
        }
        out.push(
            Diagnosis::new("dysfibrinogenemia", "Dysfibrinogenemia", Probability::Moderate)
                .describe("Functionally abnormal fibrinogen with a normal or near-normal level")
                .factors(&["FBG"])
                .tests(&["Reptilase time", "Fibrinogen antigen/activity ratio"]),
        );
        out.recommend("Exclude heparin contamination of the sample; a normal reptilase time points to heparin");
    }
}

struct IsolatedHypofibrinogenemia;

impl Rule for IsolatedHypofibrinogenemia {
    fn name(&self) -> &'static str {
        "isolated_hypofibrinogenemia"
    }

    fn matches(&self, input: &RuleInput) -> bool {
        input.flags.fibrinogen_low
    }

    fn apply(&self, input: &RuleInput, out: &mut Findings) {
        out.classify("isolated hypofibrinogenemia", Pathway::Common);
        out.push(fibrinogen_diagnosis(input.labs.fibrinogen));
        out.recommend("Repeat with a Clauss assay and a fibrinogen antigen to separate hypo- from dysfibrinogenemia");
    }
}
