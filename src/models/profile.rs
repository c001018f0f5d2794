use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ---------------------------------------------------------------------------
/// HR Zones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HrZone {
  Z1, // Recovery
  Z2, // Aerobic
  Z3, // Tempo
  Z4, // Threshold
  Z5, // VO2max
}

impl HrZone {
  pub const ALL: [HrZone; 5] = [HrZone::Z1, HrZone::Z2, HrZone::Z3, HrZone::Z4, HrZone::Z5];

  pub fn as_str(&self) -> &'static str {
    match self {
      HrZone::Z1 => "z1",
      HrZone::Z2 => "z2",
      HrZone::Z3 => "z3",
      HrZone::Z4 => "z4",
      HrZone::Z5 => "z5",
    }
  }
}

impl std::fmt::Display for HrZone {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Only the canonical lowercase labels parse, so a map can never hold two
/// keys for the same zone
impl std::str::FromStr for HrZone {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "z1" => Ok(HrZone::Z1),
      "z2" => Ok(HrZone::Z2),
      "z3" => Ok(HrZone::Z3),
      "z4" => Ok(HrZone::Z4),
      "z5" => Ok(HrZone::Z5),
      _ => Err(format!("Unknown HR zone: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// User Profile
/// ---------------------------------------------------------------------------

/// The athlete the plan is generated for.
///
/// `zones` maps `z1`..`z5` to display ranges such as `"114-132"` or `"171+"`.
/// They are only used to annotate the plan, never in computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: String,
  pub baseline_rhr: i64,
  #[serde(default)]
  pub zones: BTreeMap<String, String>,
}

impl UserProfile {
  /// Display range for a zone, if the profile carries one
  pub fn zone_range(&self, zone: HrZone) -> Option<&str> {
    self.zones.get(zone.as_str()).map(String::as_str)
  }
}
