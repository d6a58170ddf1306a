use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One of the eight ABO/Rh blood groups.
/// Parsed from and displayed as the canonical symbol ("A+", "O-", ...);
/// stored in Postgres under the `blood_group` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blood_group")]
#[serde(try_from = "String", into = "String")]
pub enum BloodGroup {
    #[sqlx(rename = "a_pos")]
    APos,
    #[sqlx(rename = "a_neg")]
    ANeg,
    #[sqlx(rename = "b_pos")]
    BPos,
    #[sqlx(rename = "b_neg")]
    BNeg,
    #[sqlx(rename = "ab_pos")]
    AbPos,
    #[sqlx(rename = "ab_neg")]
    AbNeg,
    #[sqlx(rename = "o_pos")]
    OPos,
    #[sqlx(rename = "o_neg")]
    ONeg,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APos,
        BloodGroup::ANeg,
        BloodGroup::BPos,
        BloodGroup::BNeg,
        BloodGroup::AbPos,
        BloodGroup::AbNeg,
        BloodGroup::OPos,
        BloodGroup::ONeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APos => "A+",
            BloodGroup::ANeg => "A-",
            BloodGroup::BPos => "B+",
            BloodGroup::BNeg => "B-",
            BloodGroup::AbPos => "AB+",
            BloodGroup::AbNeg => "AB-",
            BloodGroup::OPos => "O+",
            BloodGroup::ONeg => "O-",
        }
    }
}

impl FromStr for BloodGroup {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "A+" => Ok(BloodGroup::APos),
            "A-" => Ok(BloodGroup::ANeg),
            "B+" => Ok(BloodGroup::BPos),
            "B-" => Ok(BloodGroup::BNeg),
            "AB+" => Ok(BloodGroup::AbPos),
            "AB-" => Ok(BloodGroup::AbNeg),
            "O+" => Ok(BloodGroup::OPos),
            "O-" => Ok(BloodGroup::ONeg),
            other => Err(Error::ParsingError(format!(
                "{} is not a blood group",
                other
            ))),
        }
    }
}

impl TryFrom<String> for BloodGroup {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BloodGroup> for String {
    fn from(value: BloodGroup) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
