/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Building the parent/clone tree of supported games.
use std::collections::HashMap;

#[allow(unused_imports)]
use log::{error, warn, info, debug, trace};

use crate::game::{Game, GameInfo};

/// Collects game records in a single pass and resolves clones afterwards.
///
/// ```
/// use pinmame::{CatalogBuilder, GameInfo};
///
/// let mut builder = CatalogBuilder::new();
/// for (name, clone_of) in [("tz_92", ""), ("tz_94h", "tz_92"), ("zz_orphan", "zz")] {
///     builder.push(GameInfo { name: name.into(), description: name.into(),
///                             clone_of: clone_of.into(), ..GameInfo::default() });
/// }
/// let games = builder.build();
/// assert_eq!(games.len(), 2);
/// assert_eq!(games[0].clones()[0].name, "tz_94h");
/// assert!(games[1].clones().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    parents: HashMap<String, GameInfo>,
    clones: Vec<GameInfo>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. A later parent with the same name replaces an earlier one.
    pub fn push(&mut self, info: GameInfo) {
        if info.is_clone() {
            self.clones.push(info);
        }
        else if let Some(previous) = self.parents.insert(info.name.clone(), info) {
            debug!("duplicate game record: {}", previous.name);
        }
    }

    /// Returns the number of records collected so far.
    pub fn len(&self) -> usize {
        self.parents.len() + self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves the clones and returns the top-level games sorted by description.
    ///
    /// A clone whose parent was never pushed is promoted to a top-level game under its
    /// own name, with no clones of its own, unless a game with that name exists.
    pub fn build(self) -> Vec<Game> {
        let CatalogBuilder { parents, clones } = self;
        let mut attached: HashMap<String, Vec<Game>> = HashMap::new();
        let mut orphans = Vec::new();
        for clone in clones {
            if parents.contains_key(&clone.clone_of) {
                attached.entry(clone.clone_of.clone()).or_default().push(Game::new(clone));
            }
            else {
                trace!("promoting orphaned clone: {} of {}", clone.name, clone.clone_of);
                orphans.push(clone);
            }
        }
        let mut promoted: HashMap<String, GameInfo> = HashMap::new();
        for orphan in orphans {
            if parents.contains_key(&orphan.name) {
                debug!("orphaned clone shadowed by a game: {}", orphan.name);
            }
            else if let Some(previous) = promoted.insert(orphan.name.clone(), orphan) {
                debug!("duplicate game record: {}", previous.name);
            }
        }
        let mut games: Vec<Game> = parents.into_iter().map(|(name, info)| {
            let clones = attached.remove(&name).unwrap_or_default();
            Game::with_clones(info, clones)
        }).collect();
        games.extend(promoted.into_values().map(Game::new));
        games.sort_by(|a, b| a.cmp_by_description(b));
        games
    }
}

impl Extend<GameInfo> for CatalogBuilder {
    fn extend<I: IntoIterator<Item=GameInfo>>(&mut self, iter: I) {
        for info in iter {
            self.push(info);
        }
    }
}

impl FromIterator<GameInfo> for CatalogBuilder {
    fn from_iter<I: IntoIterator<Item=GameInfo>>(iter: I) -> Self {
        let mut builder = CatalogBuilder::new();
        builder.extend(iter);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, description: &str, clone_of: &str) -> GameInfo {
        GameInfo {
            name: name.into(),
            description: description.into(),
            clone_of: clone_of.into(),
            ..GameInfo::default()
        }
    }

    #[test]
    fn catalog_attaches_and_promotes_clones() {
        let builder: CatalogBuilder = vec![
            info("A", "Game A", ""),
            info("B", "Game B", "A"),
            info("C", "Game C", "Z"),
        ].into_iter().collect();
        assert_eq!(builder.len(), 3);
        let games = builder.build();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].name, "A");
        assert_eq!(games[0].clones().len(), 1);
        assert_eq!(games[0].clones()[0].name, "B");
        assert_eq!(games[1].name, "C");
        assert_eq!(games[1].clone_of, "Z");
        assert!(games[1].clones().is_empty());
    }

    #[test]
    fn catalog_is_sorted_by_description() {
        let mut builder = CatalogBuilder::new();
        builder.push(info("t2_l6", "Terminator 2 (L-6)", "t2_l8"));
        builder.push(info("tz_92", "Twilight Zone (L-9)", ""));
        builder.push(info("t2_l8", "Terminator 2 (L-8)", ""));
        builder.push(info("t2_l2", "Terminator 2 (L-2)", "t2_l8"));
        builder.push(info("afm_113", "Attack From Mars (1.13)", ""));
        builder.push(info("afm_10", "Attack From Mars (1.0)", "afm_113"));
        let games = builder.build();
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["afm_113", "t2_l8", "tz_92"]);
        let clones: Vec<&str> = games[1].clones().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(clones, ["t2_l2", "t2_l6"]);
        assert_eq!(games[0].clones()[0].name, "afm_10");
        assert!(games[2].clones().is_empty());
    }

    #[test]
    fn catalog_clone_of_clone_is_promoted() {
        let games = CatalogBuilder::from_iter([
            info("p", "Parent", ""),
            info("c", "Clone", "p"),
            info("cc", "Clone of clone", "c"),
        ]).build();
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["cc", "p"]);
        assert_eq!(games[1].clones()[0].name, "c");
    }

    #[test]
    fn catalog_names_are_unique() {
        let games = CatalogBuilder::from_iter([
            info("p", "Parent", ""),
            info("p", "Parent clone", "missing"),
            info("q", "Orphan", "missing"),
            info("q", "Orphan again", "gone"),
        ]).build();
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["q", "p"]);
        assert_eq!(games[1].description, "Parent");
        assert!(games[1].clones().is_empty());
    }

    #[test]
    fn empty_catalog_works() {
        let builder = CatalogBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.build().is_empty());
    }
}
