pub mod db;
pub mod logging;
pub mod ranking;
pub mod skills;

pub use skills::{SkillGroup, SkillParseError};
