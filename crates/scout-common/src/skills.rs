use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// One skill group as stored on a listing: a primary skill name plus the
/// fine-grained sub-skills used as matching keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillGroup {
    pub skills: String,
    pub subskills: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SkillParseError {
    #[error("listing skills are not a JSON array")]
    NotAnArray,
    #[error("skill group {index} is malformed: {reason}")]
    MalformedGroup { index: usize, reason: String },
}

/// Parse the `skills` JSONB column of a listing into skill groups.
///
/// Every group is validated, not just the first one: each must be an object
/// with a `skills` name and a `subskills` array (the array may be empty).
pub fn parse_skill_groups(raw: &Value) -> Result<Vec<SkillGroup>, SkillParseError> {
    let items = raw.as_array().ok_or(SkillParseError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<SkillGroup>(item.clone()).map_err(|err| {
                SkillParseError::MalformedGroup {
                    index,
                    reason: err.to_string(),
                }
            })
        })
        .collect()
}

/// Flatten all sub-skill names across every group into one deduplicated
/// target set, preserving first-seen order.
pub fn target_subskills(groups: &[SkillGroup]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut targets = Vec::new();

    for group in groups {
        for subskill in &group.subskills {
            let trimmed = subskill.trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_string()) {
                targets.push(trimmed.to_string());
            }
        }
    }

    targets
}
