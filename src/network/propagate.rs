use crate::network::{ActivityMap, FactorTable};

/// Clamps every activated form to the activity of its zymogen.
///
/// Zymogens are never activated forms themselves, so the pairs are independent
/// and one pass reaches the fixed point. Feedback edges (thrombin onto V, VIII
/// and XI) are left untouched: how far they should raise zymogen activity is
/// unresolved, so this pass does not apply them.
pub fn propagate(factors: &FactorTable, activity: &ActivityMap) -> ActivityMap {
    let mut next = activity.clone();
    for (zymogen, activated) in factors.activation_pairs() {
        if let (Some(z), Some(a)) = (next.get(zymogen), next.get(activated)) {
            next.set(activated, a.min(z));
        }
    }
    next
}
