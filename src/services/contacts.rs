use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        contact::{Contact, ContactPatch},
        store::Store,
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CreateContactError {
    #[error("A contact needs a first name, a last name or a company name")]
    MissingName,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct CreateContactParameters {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub role: Option<String>,
    pub contact_type: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub vat_number: Option<String>,
    pub tax_office: Option<String>,
    pub notes: Option<String>,
}

pub fn create_contact(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateContactParameters,
) -> Result<Contact, CreateContactError> {
    let contact = Contact {
        id: Uuid::new_v4(),
        first_name: parameters.first_name,
        last_name: parameters.last_name,
        company_name: parameters.company_name,
        role: parameters.role,
        contact_type: parameters.contact_type,
        phone: parameters.phone,
        email: parameters.email,
        address: parameters.address,
        city: parameters.city,
        vat_number: parameters.vat_number,
        tax_office: parameters.tax_office,
        notes: parameters.notes,
        created_at: jiff::Timestamp::now(),
    };

    // Validate before touching the store: an invalid contact never reaches it
    if !contact.has_name() {
        return Err(CreateContactError::MissingName);
    }

    let created = contact.clone();
    store.add_contact(contact);
    storage.save(store)?;

    Ok(created)
}

#[derive(Debug, Error)]
pub enum FindContactError {
    #[error("Contact '{0}' not found")]
    NotFound(String),

    #[error("Contact query is ambiguous. Multiple contacts found: {}", .0.join(", "))]
    Ambiguous(Vec<String>),
}

/// Case-insensitive substring match over display name, role and company,
/// the same fields the contact list search box filters on.
pub fn find_contact(store: &Store, query: &str) -> Result<Contact, FindContactError> {
    let needle = query.to_lowercase();
    let matching: Vec<&Contact> = store
        .contacts
        .iter()
        .filter(|c| {
            c.display_name().to_lowercase().contains(&needle)
                || c.company_name.to_lowercase().contains(&needle)
                || c.role
                    .as_deref()
                    .map(|r| r.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect();

    match matching.len() {
        0 => Err(FindContactError::NotFound(query.to_string())),
        1 => Ok(matching[0].clone()),
        _ => {
            let names: Vec<String> = matching.iter().map(|c| c.display_name()).collect();
            Err(FindContactError::Ambiguous(names))
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateContactError {
    #[error("Contact not found")]
    NotFound,

    #[error("Nothing to update: no fields were given")]
    EmptyPatch,

    #[error("A contact needs a first name, a last name or a company name")]
    MissingName,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub fn update_contact(
    store: &mut Store,
    storage: &impl Storage,
    id: Uuid,
    patch: ContactPatch,
) -> Result<Contact, UpdateContactError> {
    if patch.is_empty() {
        return Err(UpdateContactError::EmptyPatch);
    }

    let contact = store
        .get_contact(id)
        .ok_or(UpdateContactError::NotFound)?;

    // Apply on a copy first so a rejected patch leaves the store untouched
    let mut updated = contact.clone();
    patch.apply(&mut updated);
    if !updated.has_name() {
        return Err(UpdateContactError::MissingName);
    }

    if let Some(slot) = store.get_contact_mut(id) {
        *slot = updated.clone();
    }
    storage.save(store)?;

    Ok(updated)
}

#[derive(Debug, Error)]
pub enum DeleteContactError {
    #[error("Contact not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteContactResult {
    pub contact: Contact,
    /// The record that takes the deleted one's place in the listing: same
    /// index clamped to the shrunk list, `None` once the list is empty.
    pub next_selected: Option<Contact>,
}

pub fn delete_contact(
    store: &mut Store,
    storage: &impl Storage,
    id: Uuid,
) -> Result<DeleteContactResult, DeleteContactError> {
    let position = store
        .contacts_ordered()
        .iter()
        .position(|c| c.id == id)
        .ok_or(DeleteContactError::NotFound)?;

    let contact = store
        .remove_contact(id)
        .ok_or(DeleteContactError::NotFound)?;

    let next_selected = next_after_removal(&store.contacts_ordered(), position).cloned();

    storage.save(store)?;

    Ok(DeleteContactResult {
        contact,
        next_selected,
    })
}

/// Selection fallback after deleting the record at `removed_index` from an
/// ordered listing: keep the same index, clamped to the new last element.
pub fn next_after_removal<'a, T>(remaining: &'a [&'a T], removed_index: usize) -> Option<&'a T> {
    if remaining.is_empty() {
        None
    } else {
        Some(remaining[removed_index.min(remaining.len() - 1)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::JsonFileStorage;
    use std::path::PathBuf;

    fn temp_storage(name: &str) -> JsonFileStorage {
        let path: PathBuf =
            std::env::temp_dir().join(format!("ergon-contacts-{}-{}.json", name, Uuid::new_v4()));
        JsonFileStorage::new(path)
    }

    fn named(first: &str, last: &str) -> CreateContactParameters {
        CreateContactParameters {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..CreateContactParameters::default()
        }
    }

    #[test]
    fn create_rejects_nameless_contact() {
        let mut store = Store::default();
        let storage = temp_storage("nameless");

        let result = create_contact(&mut store, &storage, CreateContactParameters::default());
        assert!(matches!(result, Err(CreateContactError::MissingName)));
        assert!(store.contacts.is_empty(), "no write on validation failure");
    }

    #[test]
    fn create_accepts_company_only_contact() {
        let mut store = Store::default();
        let storage = temp_storage("company");

        let contact = create_contact(
            &mut store,
            &storage,
            CreateContactParameters {
                company_name: "Acme".to_string(),
                ..CreateContactParameters::default()
            },
        )
        .unwrap();

        assert_eq!(contact.display_name(), "Acme");
        assert_eq!(store.contacts.len(), 1);
    }

    #[test]
    fn find_is_ambiguous_over_shared_substrings() {
        let mut store = Store::default();
        let storage = temp_storage("ambiguous");
        create_contact(&mut store, &storage, named("Άγγελος", "Κωνσταντινίδης")).unwrap();
        create_contact(&mut store, &storage, named("Γεώργιος", "Κωνσταντίνου")).unwrap();

        let result = find_contact(&store, "Κωνσταντ");
        assert!(matches!(result, Err(FindContactError::Ambiguous(ref names)) if names.len() == 2));

        let found = find_contact(&store, "Γεώργιος").unwrap();
        assert_eq!(found.first_name, "Γεώργιος");
    }

    #[test]
    fn update_cannot_strip_every_name() {
        let mut store = Store::default();
        let storage = temp_storage("strip");
        let contact = create_contact(
            &mut store,
            &storage,
            CreateContactParameters {
                company_name: "Acme".to_string(),
                ..CreateContactParameters::default()
            },
        )
        .unwrap();

        let result = update_contact(
            &mut store,
            &storage,
            contact.id,
            ContactPatch {
                company_name: Some(String::new()),
                ..ContactPatch::default()
            },
        );
        assert!(matches!(result, Err(UpdateContactError::MissingName)));
        assert_eq!(store.get_contact(contact.id).unwrap().company_name, "Acme");
    }

    #[test]
    fn delete_selects_adjacent_record() {
        let mut store = Store::default();
        let storage = temp_storage("adjacent");
        create_contact(&mut store, &storage, named("", "Αλεξίου")).unwrap();
        let middle = create_contact(&mut store, &storage, named("", "Βασιλείου")).unwrap();
        create_contact(&mut store, &storage, named("", "Γεωργίου")).unwrap();

        let result = delete_contact(&mut store, &storage, middle.id).unwrap();
        assert_eq!(result.contact.last_name, "Βασιλείου");
        // Same index in the shrunk ordered list
        assert_eq!(result.next_selected.unwrap().last_name, "Γεωργίου");
    }

    #[test]
    fn delete_last_record_clamps_to_new_end() {
        let mut store = Store::default();
        let storage = temp_storage("clamp");
        create_contact(&mut store, &storage, named("", "Αλεξίου")).unwrap();
        let last = create_contact(&mut store, &storage, named("", "Γεωργίου")).unwrap();

        let result = delete_contact(&mut store, &storage, last.id).unwrap();
        assert_eq!(result.next_selected.unwrap().last_name, "Αλεξίου");
    }

    #[test]
    fn delete_only_record_selects_nothing() {
        let mut store = Store::default();
        let storage = temp_storage("empty");
        let only = create_contact(&mut store, &storage, named("", "Αλεξίου")).unwrap();

        let result = delete_contact(&mut store, &storage, only.id).unwrap();
        assert!(result.next_selected.is_none());
        assert!(store.contacts.is_empty());
    }
}
