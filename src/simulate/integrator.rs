//! Fixed-step RK4 over a concentration vector.

#[derive(Debug, Clone)]
pub struct IntegratorConfig {
    /// Step size in seconds.
    pub dt_s: f64,
    /// Concentrations are floored here after every step.
    pub min_concentration_nm: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            dt_s: 0.005,
            min_concentration_nm: 0.0,
        }
    }
}

pub struct Rk4Integrator {
    pub config: IntegratorConfig,
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    y_temp: Vec<f64>,
}

impl Rk4Integrator {
    pub fn new(n_variables: usize, config: IntegratorConfig) -> Self {
        Self {
            config,
            k1: vec![0.0; n_variables],
            k2: vec![0.0; n_variables],
            k3: vec![0.0; n_variables],
            k4: vec![0.0; n_variables],
            y_temp: vec![0.0; n_variables],
        }
    }

    fn resize(&mut self, n_variables: usize) {
        if self.k1.len() != n_variables {
            self.k1.resize(n_variables, 0.0);
            self.k2.resize(n_variables, 0.0);
            self.k3.resize(n_variables, 0.0);
            self.k4.resize(n_variables, 0.0);
            self.y_temp.resize(n_variables, 0.0);
        }
    }

    /// y <- y + dt/6 * (k1 + 2 k2 + 2 k3 + k4), then floored.
    pub fn step<F>(&mut self, y: &mut [f64], derivatives: F)
    where
        F: Fn(&[f64], &mut [f64]),
    {
        let dt = self.config.dt_s;
        let n = y.len();
        self.resize(n);

        derivatives(y, &mut self.k1);

        for i in 0..n {
            self.y_temp[i] = y[i] + 0.5 * dt * self.k1[i];
        }
        derivatives(&self.y_temp, &mut self.k2);

        for i in 0..n {
            self.y_temp[i] = y[i] + 0.5 * dt * self.k2[i];
        }
        derivatives(&self.y_temp, &mut self.k3);

        for i in 0..n {
            self.y_temp[i] = y[i] + dt * self.k3[i];
        }
        derivatives(&self.y_temp, &mut self.k4);

        let dt_6 = dt / 6.0;
        for i in 0..n {
            y[i] += dt_6 * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
            if y[i] < self.config.min_concentration_nm {
                y[i] = self.config.min_concentration_nm;
            }
        }
    }
}
