//! Roster store: the list of people and their selection flags.

use crate::model::person::Person;
use crate::store::{Revision, StoreResult};
use std::sync::Arc;

/// Owner of the current roster collection.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    people: Arc<Vec<Person>>,
    revision: Revision,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn people(&self) -> &[Person] {
        self.people.as_slice()
    }

    /// Shared handle to the current collection; identity changes on commit.
    pub fn snapshot(&self) -> Arc<Vec<Person>> {
        Arc::clone(&self.people)
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.people.iter().any(|person| person.name == name)
    }

    /// Names of people currently checked, in roster order.
    pub fn selected(&self) -> Vec<&str> {
        self.people
            .iter()
            .filter(|person| person.checked)
            .map(|person| person.name.as_str())
            .collect()
    }

    /// Appends an unchecked person.
    ///
    /// # Errors
    /// - `EmptyName` / `DuplicateName` leave the roster unchanged.
    pub fn add_person(&mut self, name: &str) -> StoreResult<()> {
        let person = Person::new(name);
        person.validate_against(&self.people)?;

        let mut next = Vec::with_capacity(self.people.len() + 1);
        next.extend(self.people.iter().cloned());
        next.push(person);
        self.commit(next);
        Ok(())
    }

    /// Sets one person's selection flag.
    ///
    /// Returns `false` without committing when no person has `name`.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        if !self.contains(name) {
            return false;
        }

        let next = self
            .people
            .iter()
            .map(|person| {
                if person.name == name {
                    Person {
                        checked,
                        ..person.clone()
                    }
                } else {
                    person.clone()
                }
            })
            .collect();
        self.commit(next);
        true
    }

    /// Clears every selection flag.
    pub fn reset_all_checked(&mut self) {
        let next = self
            .people
            .iter()
            .map(|person| Person {
                checked: false,
                ..person.clone()
            })
            .collect();
        self.commit(next);
    }

    pub fn clear_all(&mut self) {
        self.commit(Vec::new());
    }

    /// Replaces the whole roster with a decoded snapshot.
    ///
    /// Entries with an empty name, and later entries repeating an earlier
    /// name, are dropped so names stay unique. Returns the dropped count.
    pub fn replace_all(&mut self, people: Vec<Person>) -> usize {
        let offered = people.len();
        let mut kept: Vec<Person> = Vec::with_capacity(offered);
        for person in people {
            if person.name.is_empty() || kept.iter().any(|seen| seen.name == person.name) {
                continue;
            }
            kept.push(person);
        }
        let dropped = offered - kept.len();
        self.commit(kept);
        dropped
    }

    fn commit(&mut self, next: Vec<Person>) {
        self.people = Arc::new(next);
        self.revision += 1;
    }
}
