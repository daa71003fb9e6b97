use crate::diagnosis::{ClinicalInterpretation, Findings, RuleInput, addenda, patterns};

pub const RULE_SET_VERSION: &str = "v1";

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn matches(&self, input: &RuleInput) -> bool;
    fn apply(&self, input: &RuleInput, out: &mut Findings);
}

pub struct RuleSet {
    version: &'static str,
    patterns: Vec<Box<dyn Rule>>,
    addenda: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new(
        version: &'static str,
        patterns: Vec<Box<dyn Rule>>,
        addenda: Vec<Box<dyn Rule>>,
    ) -> Self {
        Self {
            version,
            patterns,
            addenda,
        }
    }

    pub fn canonical_v1() -> Self {
        Self::new(RULE_SET_VERSION, patterns::ordered(), addenda::ordered())
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|r| r.name()).collect()
    }

    pub fn evaluate(&self, input: &RuleInput) -> ClinicalInterpretation {
        let mut findings = Findings::default();
        if let Some(rule) = self.patterns.iter().find(|r| r.matches(input)) {
            findings.pattern_rule = Some(rule.name());
            rule.apply(input, &mut findings);
        }
        for rule in &self.addenda {
            if rule.matches(input) {
                rule.apply(input, &mut findings);
            }
        }
        findings.into_interpretation(self.version)
    }
}
