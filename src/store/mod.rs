//! Player and announcement storage
//!
//! A single JSON document holding every player profile and team
//! announcement. Stored in the XDG data directory
//! (~/.local/share/hoopmatch/store.json) unless the config overrides it.

use crate::error::{Error, Result};
use crate::model::{Player, TeamAnnouncement};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    announcements: Vec<TeamAnnouncement>,
}

/// Storage manager
///
/// Every mutation is applied to a staged copy and written to disk before it
/// becomes visible; a failed write leaves the store as it was.
#[derive(Debug)]
pub struct Store {
    data: StoreData,
    /// `None` keeps everything in memory
    path: Option<PathBuf>,
}

impl Store {
    /// An empty store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            data: StoreData::default(),
            path: None,
        }
    }

    /// Load the store from a file, starting empty if it does not exist
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Storage(format!("Failed to read store file: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| Error::Storage(format!("Failed to parse store file: {}", e)))?
        } else {
            StoreData::default()
        };

        debug!(
            path = %path.display(),
            players = data.players.len(),
            announcements = data.announcements.len(),
            "store loaded"
        );

        Ok(Self {
            data,
            path: Some(path),
        })
    }

    /// File backing this store, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write `staged` to disk, then make it the live data
    fn commit(&mut self, staged: StoreData) -> Result<()> {
        if let Some(path) = &self.path {
            write_file(path, &staged)?;
        }
        self.data = staged;
        Ok(())
    }

    pub fn players(&self) -> &[Player] {
        &self.data.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.data.players.iter().find(|p| p.id == id)
    }

    /// The profile owned by a user
    pub fn player_by_user(&self, user: &str) -> Option<&Player> {
        self.data.players.iter().find(|p| p.user == user)
    }

    /// Add a player; each user may own one profile
    pub fn insert_player(&mut self, player: Player) -> Result<()> {
        if self.player_by_user(&player.user).is_some() {
            return Err(Error::Conflict(format!(
                "User '{}' already has a player profile",
                player.user
            )));
        }
        let mut staged = self.data.clone();
        staged.players.push(player);
        self.commit(staged)
    }

    /// Modify the stored player with `id` and return the result
    pub fn update_player<F>(&mut self, id: &str, modify: F) -> Result<Player>
    where
        F: FnOnce(&mut Player),
    {
        let mut staged = self.data.clone();
        let slot = staged
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("player {}", id)))?;
        modify(slot);
        let updated = slot.clone();

        self.commit(staged)?;
        Ok(updated)
    }

    pub fn announcements(&self) -> &[TeamAnnouncement] {
        &self.data.announcements
    }

    pub fn announcement(&self, id: &str) -> Option<&TeamAnnouncement> {
        self.data.announcements.iter().find(|a| a.id == id)
    }

    /// Add an announcement; each team may publish one
    pub fn insert_announcement(&mut self, announcement: TeamAnnouncement) -> Result<()> {
        if self
            .data
            .announcements
            .iter()
            .any(|a| a.team_id == announcement.team_id)
        {
            return Err(Error::Conflict(format!(
                "Team '{}' already has an announcement",
                announcement.team_id
            )));
        }
        let mut staged = self.data.clone();
        staged.announcements.push(announcement);
        self.commit(staged)
    }

    /// Modify the stored announcement with `id` and return the result
    pub fn update_announcement<F>(&mut self, id: &str, modify: F) -> Result<TeamAnnouncement>
    where
        F: FnOnce(&mut TeamAnnouncement),
    {
        let mut staged = self.data.clone();
        let slot = staged
            .announcements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("announcement {}", id)))?;
        modify(slot);
        let updated = slot.clone();

        self.commit(staged)?;
        Ok(updated)
    }

    /// Remove announcement by ID; `None` if there was none
    pub fn remove_announcement(&mut self, id: &str) -> Result<Option<TeamAnnouncement>> {
        let Some(idx) = self.data.announcements.iter().position(|a| a.id == id) else {
            return Ok(None);
        };
        let mut staged = self.data.clone();
        let removed = staged.announcements.remove(idx);
        self.commit(staged)?;
        Ok(Some(removed))
    }
}

fn write_file(path: &Path, data: &StoreData) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Storage(format!("Failed to create store directory: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(data)
        .map_err(|e| Error::Storage(format!("Failed to serialize store: {}", e)))?;

    fs::write(path, content)
        .map_err(|e| Error::Storage(format!("Failed to write store file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Coordinates, GeoPoint};
    use crate::model::{Level, NewAnnouncement, NewPlayer, Position, Sex, TimeSlot, Weekday};
    use tempfile::TempDir;

    fn player(user: &str) -> Player {
        NewPlayer {
            user: user.to_string(),
            name: user.to_uppercase(),
            age: 30,
            height_m: 1.9,
            position: Position::Center,
            level: Level::High,
            sex: Sex::Male,
            email: format!("{}@example.com", user),
            description: String::new(),
            address: "Calle Mayor 1".to_string(),
        }
        .into_player()
    }

    fn announcement(team: &str) -> TeamAnnouncement {
        NewAnnouncement {
            team_id: team.to_string(),
            team_name: format!("Team {}", team),
            match_day: Weekday::Sunday,
            match_slot: TimeSlot::Afternoon,
            match_address: "Pabellón".to_string(),
            training_day: None,
            training_slot: None,
            training_address: None,
            description: String::new(),
        }
        .into_announcement()
    }

    #[test]
    fn test_one_profile_per_user() {
        let mut store = Store::in_memory();
        store.insert_player(player("ana")).unwrap();

        let result = store.insert_player(player("ana"));

        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(store.players().len(), 1);
        assert!(store.player_by_user("ana").is_some());
    }

    #[test]
    fn test_one_announcement_per_team() {
        let mut store = Store::in_memory();
        store.insert_announcement(announcement("t1")).unwrap();
        store.insert_announcement(announcement("t2")).unwrap();

        assert!(matches!(
            store.insert_announcement(announcement("t1")),
            Err(Error::Conflict(_))
        ));
        assert_eq!(store.announcements().len(), 2);
    }

    #[test]
    fn test_update_and_remove() {
        let mut store = Store::in_memory();
        let a = announcement("t1");
        let id = a.id.clone();
        store.insert_announcement(a).unwrap();

        let updated = store
            .update_announcement(&id, |a| a.description = "Buscamos base".to_string())
            .unwrap();
        assert_eq!(updated.description, "Buscamos base");
        assert_eq!(store.announcement(&id).unwrap().description, "Buscamos base");

        assert!(store.remove_announcement(&id).unwrap().is_some());
        assert!(store.remove_announcement(&id).unwrap().is_none());
        assert!(matches!(
            store.update_announcement("t9", |_| {}),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(store.update_player("nobody", |_| {}), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("store.json");

        let mut p = player("ana");
        p.residence.point = GeoPoint::located(Coordinates::new(40.4168, -3.7038));
        let id = p.id.clone();

        let mut store = Store::load_from(path.clone()).unwrap();
        store.insert_player(p).unwrap();
        store.insert_announcement(announcement("t1")).unwrap();
        store.update_player(&id, |p| p.age = 31).unwrap();

        let loaded = Store::load_from(path).unwrap();
        assert_eq!(loaded.players().len(), 1);
        assert_eq!(loaded.announcements().len(), 1);
        let stored = loaded.player(&id).unwrap();
        assert_eq!(stored.age, 31);
        assert_eq!(stored.residence.point.coords(), Some(Coordinates::new(40.4168, -3.7038)));
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = Store::load_from(blocker.join("store.json")).unwrap();

        assert!(matches!(store.insert_player(player("ana")), Err(Error::Storage(_))));
        assert!(store.players().is_empty());
        // Not a conflict: the first insert never happened
        assert!(matches!(store.insert_player(player("ana")), Err(Error::Storage(_))));
        assert!(matches!(
            store.insert_announcement(announcement("t1")),
            Err(Error::Storage(_))
        ));
        assert!(store.announcements().is_empty());
    }

    #[test]
    fn test_failed_update_is_rolled_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        let mut store = Store::load_from(path.clone()).unwrap();
        let a = announcement("t1");
        let id = a.id.clone();
        store.insert_announcement(a).unwrap();

        // Turn the store file into a directory so the next write fails
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let result = store.update_announcement(&id, |a| a.description = "lost".to_string());
        assert!(matches!(result, Err(Error::Storage(_))));
        assert_eq!(store.announcement(&id).unwrap().description, "");

        assert!(matches!(store.remove_announcement(&id), Err(Error::Storage(_))));
        assert!(store.announcement(&id).is_some());
    }

    #[test]
    fn test_in_memory_store_has_no_path() {
        let mut store = Store::in_memory();
        assert!(store.path().is_none());
        assert!(store.insert_player(player("ana")).is_ok());
    }
    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(Store::load_from(path), Err(Error::Storage(_))));
    }
}
