use serde::{Deserialize, Serialize};

/// Stable identifier for a volunteer, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VolunteerId(String);

impl VolunteerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key shared by every member of a co-allocatable group.
///
/// An empty key never appears on a [`VolunteerGroup`](crate::model::VolunteerGroup) after
/// init: individuals are synthesised a `"individual_<volunteer id>"` key (§4.3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(String);

impl Default for GroupKey {
    fn default() -> Self {
        Self(String::new())
    }
}

impl GroupKey {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }

    pub fn individual(volunteer_id: &VolunteerId) -> Self {
        Self(format!("individual_{}", volunteer_id.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Arena index into [`VolunteerState::groups`](crate::model::VolunteerState::groups).
///
/// Shifts and the ranking/exhausted pools all refer to a group through this id rather than
/// copying or sharing the group by reference, so mutation always goes through one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);
