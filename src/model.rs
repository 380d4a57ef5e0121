//! Player profiles and team announcements
//!
//! Only the fields the matching core reads are load-bearing; the rest is
//! descriptive metadata returned alongside ranked results.

use crate::coord::proximity::Geotagged;
use crate::coord::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text address and its derived point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

impl Location {
    /// An address that has not been located yet
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            point: GeoPoint::absent(),
        }
    }

    /// Whitespace-only addresses count as empty
    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty()
    }
}

/// Court position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

/// How competitive a player wants games to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Relaxed,
    Intermediate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    AllDay,
    Any,
}

/// Which location of an announcement to measure against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    #[default]
    Match,
    Training,
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Training => write!(f, "training"),
        }
    }
}

impl std::str::FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "match" | "game" => Ok(Self::Match),
            "training" | "practice" => Ok(Self::Training),
            _ => Err(format!("Unknown site: {}", s)),
        }
    }
}

/// A player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    /// Owning account; at most one profile per user
    pub user: String,
    pub name: String,
    pub age: u32,
    /// Height in meters
    pub height_m: f64,
    pub position: Position,
    pub level: Level,
    pub sex: Sex,
    pub email: String,
    #[serde(default)]
    pub description: String,
    pub residence: Location,
}

impl Geotagged for Player {
    fn geo_point(&self) -> GeoPoint {
        self.residence.point
    }
}

/// Fields supplied when creating a player
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlayer {
    pub user: String,
    pub name: String,
    pub age: u32,
    pub height_m: f64,
    pub position: Position,
    pub level: Level,
    pub sex: Sex,
    pub email: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
}

impl NewPlayer {
    /// Build the profile with an unlocated residence
    pub fn into_player(self) -> Player {
        Player {
            id: uuid::Uuid::new_v4().to_string(),
            user: self.user,
            name: self.name,
            age: self.age,
            height_m: self.height_m,
            position: self.position,
            level: self.level,
            sex: self.sex,
            email: self.email,
            description: self.description,
            residence: Location::new(self.address),
        }
    }
}

/// Partial update of a player; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub height_m: Option<f64>,
    pub position: Option<Position>,
    pub level: Option<Level>,
    pub sex: Option<Sex>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

impl PlayerUpdate {
    /// Apply every field except the address, which needs the resolver
    pub fn apply_details(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(age) = self.age {
            player.age = age;
        }
        if let Some(height_m) = self.height_m {
            player.height_m = height_m;
        }
        if let Some(position) = self.position {
            player.position = position;
        }
        if let Some(level) = self.level {
            player.level = level;
        }
        if let Some(sex) = self.sex {
            player.sex = sex;
        }
        if let Some(email) = &self.email {
            player.email = email.clone();
        }
        if let Some(description) = &self.description {
            player.description = description.clone();
        }
    }
}

/// A team looking for players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAnnouncement {
    pub id: String,
    /// At most one announcement per team
    pub team_id: String,
    pub team_name: String,
    pub match_day: Weekday,
    pub match_slot: TimeSlot,
    pub match_location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_day: Option<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_slot: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_location: Option<Location>,
    #[serde(default)]
    pub description: String,
    pub created: DateTime<Utc>,
}

impl TeamAnnouncement {
    /// The location for a site, if the announcement has one
    pub fn location(&self, site: Site) -> Option<&Location> {
        match site {
            Site::Match => Some(&self.match_location),
            Site::Training => self.training_location.as_ref(),
        }
    }

    /// The point for a site; absent when the site has no location
    pub fn point(&self, site: Site) -> GeoPoint {
        self.location(site).map(|l| l.point).unwrap_or_default()
    }
}

impl Geotagged for TeamAnnouncement {
    fn geo_point(&self) -> GeoPoint {
        self.point(Site::Match)
    }
}

/// Fields supplied when creating an announcement
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnouncement {
    pub team_id: String,
    pub team_name: String,
    pub match_day: Weekday,
    pub match_slot: TimeSlot,
    pub match_address: String,
    pub training_day: Option<Weekday>,
    pub training_slot: Option<TimeSlot>,
    pub training_address: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl NewAnnouncement {
    /// Build the announcement with unlocated addresses
    pub fn into_announcement(self) -> TeamAnnouncement {
        TeamAnnouncement {
            id: uuid::Uuid::new_v4().to_string(),
            team_id: self.team_id,
            team_name: self.team_name,
            match_day: self.match_day,
            match_slot: self.match_slot,
            match_location: Location::new(self.match_address),
            training_day: self.training_day,
            training_slot: self.training_slot,
            training_location: self
                .training_address
                .filter(|a| !a.trim().is_empty())
                .map(Location::new),
            description: self.description,
            created: Utc::now(),
        }
    }
}

/// Partial update of an announcement; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementUpdate {
    pub match_day: Option<Weekday>,
    pub match_slot: Option<TimeSlot>,
    pub match_address: Option<String>,
    pub training_day: Option<Weekday>,
    pub training_slot: Option<TimeSlot>,
    pub training_address: Option<String>,
    pub description: Option<String>,
}

impl AnnouncementUpdate {
    /// Apply every field except the addresses, which need the resolver
    pub fn apply_details(&self, announcement: &mut TeamAnnouncement) {
        if let Some(day) = self.match_day {
            announcement.match_day = day;
        }
        if let Some(slot) = self.match_slot {
            announcement.match_slot = slot;
        }
        if let Some(day) = self.training_day {
            announcement.training_day = Some(day);
        }
        if let Some(slot) = self.training_slot {
            announcement.training_slot = Some(slot);
        }
        if let Some(description) = &self.description {
            announcement.description = description.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;

    fn announcement() -> TeamAnnouncement {
        NewAnnouncement {
            team_id: "t1".to_string(),
            team_name: "Leganés Hoops".to_string(),
            match_day: Weekday::Saturday,
            match_slot: TimeSlot::Morning,
            match_address: "Pabellón Europa".to_string(),
            training_day: None,
            training_slot: None,
            training_address: Some("   ".to_string()),
            description: String::new(),
        }
        .into_announcement()
    }

    #[test]
    fn test_blank_training_address_dropped() {
        let a = announcement();
        assert!(a.training_location.is_none());
        assert!(!a.match_location.point.is_located());
        assert_eq!(a.point(Site::Training), GeoPoint::absent());
    }

    #[test]
    fn test_site_points() {
        let mut a = announcement();
        a.match_location.point = GeoPoint::located(Coordinates::new(40.33, -3.76));
        let mut training = Location::new("Polideportivo");
        training.point = GeoPoint::located(Coordinates::new(40.34, -3.77));
        a.training_location = Some(training);

        assert_eq!(a.point(Site::Match).coords(), Some(Coordinates::new(40.33, -3.76)));
        assert_eq!(a.point(Site::Training).coords(), Some(Coordinates::new(40.34, -3.77)));
        assert_eq!(a.geo_point(), a.point(Site::Match));
    }

    #[test]
    fn test_location_wire_shape() {
        let mut location = Location::new("Calle Mayor 1");
        location.point = GeoPoint::located(Coordinates::new(40.4, -3.7));

        let json = serde_json::to_value(&location).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"address": "Calle Mayor 1", "latitude": 40.4, "longitude": -3.7})
        );
        let parsed: Location = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, location);
    }

    #[test]
    fn test_player_update_leaves_address_alone() {
        let mut player = NewPlayer {
            user: "ana".to_string(),
            name: "Ana".to_string(),
            age: 24,
            height_m: 1.78,
            position: Position::SmallForward,
            level: Level::Intermediate,
            sex: Sex::Female,
            email: "ana@example.com".to_string(),
            description: String::new(),
            address: "Calle Mayor 1".to_string(),
        }
        .into_player();

        let update = PlayerUpdate {
            age: Some(25),
            address: Some("Somewhere else".to_string()),
            ..Default::default()
        };
        update.apply_details(&mut player);

        assert_eq!(player.age, 25);
        assert_eq!(player.residence.address, "Calle Mayor 1");
    }

    #[test]
    fn test_site_parse() {
        assert_eq!("training".parse::<Site>().unwrap(), Site::Training);
        assert_eq!("MATCH".parse::<Site>().unwrap(), Site::Match);
        assert!("gym".parse::<Site>().is_err());
    }
}
