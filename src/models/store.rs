use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    contact::Contact,
    custom_list::{CustomList, ListItem},
    project::Project,
};

/// Current schema version
pub const CURRENT_VERSION: u32 = 1;

/// In-memory image of the whole document store: three top-level collections
/// plus the item sub-collection of the custom lists.
#[derive(Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    pub contacts: Vec<Contact>,
    pub projects: Vec<Project>,
    pub lists: Vec<CustomList>,
    pub list_items: Vec<ListItem>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            contacts: vec![],
            projects: vec![],
            lists: vec![],
            list_items: vec![],
        }
    }
}

/// One page of the cursor-paginated contact listing.
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub next_cursor: Option<Uuid>,
    pub has_more: bool,
}

impl Store {
    // --- contacts ---

    pub fn get_contact(&self, id: Uuid) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn get_contact_mut(&mut self, id: Uuid) -> Option<&mut Contact> {
        self.contacts.iter_mut().find(|c| c.id == id)
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn remove_contact(&mut self, id: Uuid) -> Option<Contact> {
        let index = self.contacts.iter().position(|c| c.id == id)?;
        Some(self.contacts.remove(index))
    }

    /// Contacts in last-name order, the order the contact list renders in.
    pub fn contacts_ordered(&self) -> Vec<&Contact> {
        let mut contacts: Vec<_> = self.contacts.iter().collect();
        contacts.sort_by_key(|c| c.sort_key());
        contacts
    }

    /// Fixed-size page of the ordered contact listing. `after` is the id of
    /// the last contact of the previous page; an unknown cursor starts over
    /// from the beginning.
    pub fn contacts_page(&self, after: Option<Uuid>, limit: usize) -> ContactPage {
        let ordered = self.contacts_ordered();

        let start = match after {
            Some(cursor) => ordered
                .iter()
                .position(|c| c.id == cursor)
                .map(|i| i + 1)
                .unwrap_or(0),
            None => 0,
        };

        let page: Vec<Contact> = ordered
            .iter()
            .skip(start)
            .take(limit)
            .map(|c| (*c).clone())
            .collect();

        let has_more = start + page.len() < ordered.len();
        let next_cursor = if has_more {
            page.last().map(|c| c.id)
        } else {
            None
        };

        ContactPage {
            contacts: page,
            next_cursor,
            has_more,
        }
    }

    // --- projects ---

    pub fn get_project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn get_project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn remove_project(&mut self, id: Uuid) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(index))
    }

    /// Projects newest-first, the order the project list renders in.
    pub fn projects_ordered(&self) -> Vec<&Project> {
        let mut projects: Vec<_> = self.projects.iter().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        projects
    }

    pub fn projects_for_owner(&self, contact_id: Uuid) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .filter(move |p| p.owner_id == Some(contact_id))
    }

    // --- custom lists ---

    pub fn get_list(&self, id: Uuid) -> Option<&CustomList> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn add_list(&mut self, list: CustomList) {
        self.lists.push(list);
    }

    pub fn remove_list(&mut self, id: Uuid) -> Option<CustomList> {
        let index = self.lists.iter().position(|l| l.id == id)?;
        Some(self.lists.remove(index))
    }

    pub fn lists_ordered(&self) -> Vec<&CustomList> {
        let mut lists: Vec<_> = self.lists.iter().collect();
        lists.sort_by_key(|l| l.title.to_lowercase());
        lists
    }

    pub fn add_list_item(&mut self, item: ListItem) {
        self.list_items.push(item);
    }

    /// Items of one list, ordered by value.
    pub fn items_for_list(&self, list_id: Uuid) -> Vec<&ListItem> {
        let mut items: Vec<_> = self
            .list_items
            .iter()
            .filter(|i| i.list_id == list_id)
            .collect();
        items.sort_by_key(|i| i.value.to_lowercase());
        items
    }

    pub fn remove_list_item(&mut self, id: Uuid) -> Option<ListItem> {
        let index = self.list_items.iter().position(|i| i.id == id)?;
        Some(self.list_items.remove(index))
    }

    /// Drop every item of a list, returning how many were removed.
    pub fn remove_items_of_list(&mut self, list_id: Uuid) -> usize {
        let before = self.list_items.len();
        self.list_items.retain(|i| i.list_id != list_id);
        before - self.list_items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(last: &str, first: &str) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Contact::default()
        }
    }

    #[test]
    fn contacts_ordered_by_last_name() {
        let mut store = Store::default();
        store.add_contact(contact("Κωνσταντινίδης", "Άγγελος"));
        store.add_contact(contact("Καψίδου", "Δέσποινα"));

        let ordered = store.contacts_ordered();
        assert_eq!(ordered[0].last_name, "Καψίδου");
        assert_eq!(ordered[1].last_name, "Κωνσταντινίδης");
    }

    #[test]
    fn pagination_walks_the_whole_collection() {
        let mut store = Store::default();
        for i in 0..5 {
            store.add_contact(contact(&format!("c{}", i), ""));
        }

        let first = store.contacts_page(None, 2);
        assert_eq!(first.contacts.len(), 2);
        assert!(first.has_more);
        let cursor = first.next_cursor.expect("cursor on a non-final page");

        let second = store.contacts_page(Some(cursor), 2);
        assert_eq!(second.contacts.len(), 2);
        assert!(second.has_more);

        let third = store.contacts_page(second.next_cursor, 2);
        assert_eq!(third.contacts.len(), 1);
        assert!(!third.has_more);
        assert!(third.next_cursor.is_none());

        // No overlap and nothing skipped
        let mut seen: Vec<_> = first
            .contacts
            .iter()
            .chain(&second.contacts)
            .chain(&third.contacts)
            .map(|c| c.id)
            .collect();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn unknown_cursor_starts_over() {
        let mut store = Store::default();
        store.add_contact(contact("a", ""));
        let page = store.contacts_page(Some(Uuid::new_v4()), 10);
        assert_eq!(page.contacts.len(), 1);
        assert!(!page.has_more);
    }

    #[test]
    fn remove_items_of_list_counts_removed() {
        let mut store = Store::default();
        let list_id = Uuid::new_v4();
        for value in ["a", "b", "c"] {
            store.add_list_item(ListItem {
                id: Uuid::new_v4(),
                list_id,
                value: value.to_string(),
                ..ListItem::default()
            });
        }
        store.add_list_item(ListItem {
            id: Uuid::new_v4(),
            list_id: Uuid::new_v4(),
            value: "other".to_string(),
            ..ListItem::default()
        });

        assert_eq!(store.remove_items_of_list(list_id), 3);
        assert_eq!(store.list_items.len(), 1);
    }
}
