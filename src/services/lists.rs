use slug::slugify;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        custom_list::{CustomList, ListItem, split_items},
        store::Store,
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CreateListError {
    #[error("A list needs a title")]
    MissingTitle,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct CreateListParameters {
    pub title: String,
    pub description: Option<String>,
    /// Optional semicolon-delimited initial values
    pub items: Option<String>,
}

pub struct CreateListResult {
    pub list: CustomList,
    pub items_created: usize,
}

pub fn create_list(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateListParameters,
) -> Result<CreateListResult, CreateListError> {
    if parameters.title.trim().is_empty() {
        return Err(CreateListError::MissingTitle);
    }

    let list = CustomList {
        id: Uuid::new_v4(),
        slug: slugify(&parameters.title),
        title: parameters.title,
        description: parameters.description,
        created_at: jiff::Timestamp::now(),
    };
    let created = list.clone();
    let list_id = list.id;
    store.add_list(list);

    let values = parameters
        .items
        .as_deref()
        .map(split_items)
        .unwrap_or_default();
    let items_created = values.len();
    for value in values {
        store.add_list_item(ListItem {
            id: Uuid::new_v4(),
            list_id,
            value,
            created_at: jiff::Timestamp::now(),
        });
    }

    // List and initial items land in a single commit
    storage.save(store)?;

    Ok(CreateListResult {
        list: created,
        items_created,
    })
}

#[derive(Debug, Error)]
pub enum FindListError {
    #[error("List '{0}' not found")]
    NotFound(String),

    #[error("List query is ambiguous. Multiple lists found: {}", .0.join(", "))]
    Ambiguous(Vec<String>),
}

/// Exact slug match first, then case-insensitive substring match on titles.
pub fn find_list(store: &Store, query: &str) -> Result<CustomList, FindListError> {
    if let Some(list) = store
        .lists
        .iter()
        .find(|l| l.slug.eq_ignore_ascii_case(query))
    {
        return Ok(list.clone());
    }

    let needle = query.to_lowercase();
    let matching: Vec<&CustomList> = store
        .lists
        .iter()
        .filter(|l| l.title.to_lowercase().contains(&needle))
        .collect();

    match matching.len() {
        0 => Err(FindListError::NotFound(query.to_string())),
        1 => Ok(matching[0].clone()),
        _ => {
            let titles: Vec<String> = matching.iter().map(|l| l.title.clone()).collect();
            Err(FindListError::Ambiguous(titles))
        }
    }
}

#[derive(Debug, Error)]
pub enum AddItemsError {
    #[error("List not found")]
    ListNotFound,

    #[error("No values given: every segment was empty after trimming")]
    NoValues,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Add one value or a semicolon-delimited batch to a list. Segments are
/// trimmed, empty ones dropped, and all resulting items land in one commit.
pub fn add_items(
    store: &mut Store,
    storage: &impl Storage,
    list_id: Uuid,
    raw: &str,
) -> Result<Vec<ListItem>, AddItemsError> {
    if store.get_list(list_id).is_none() {
        return Err(AddItemsError::ListNotFound);
    }

    let values = split_items(raw);
    if values.is_empty() {
        return Err(AddItemsError::NoValues);
    }

    let mut created = Vec::with_capacity(values.len());
    for value in values {
        let item = ListItem {
            id: Uuid::new_v4(),
            list_id,
            value,
            created_at: jiff::Timestamp::now(),
        };
        created.push(item.clone());
        store.add_list_item(item);
    }

    storage.save(store)?;

    Ok(created)
}

#[derive(Debug, Error)]
pub enum DeleteItemError {
    #[error("List not found")]
    ListNotFound,

    #[error("No item '{0}' in this list")]
    ItemNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Remove a single item, addressed by its id or by exact value. Duplicate
/// values are removed one at a time, first match in value order.
pub fn delete_item(
    store: &mut Store,
    storage: &impl Storage,
    list_id: Uuid,
    id_or_value: &str,
) -> Result<ListItem, DeleteItemError> {
    if store.get_list(list_id).is_none() {
        return Err(DeleteItemError::ListNotFound);
    }

    let by_id = id_or_value.parse::<Uuid>().ok();
    let target = store
        .items_for_list(list_id)
        .iter()
        .find(|i| match by_id {
            Some(id) => i.id == id,
            None => i.value == id_or_value,
        })
        .map(|i| i.id)
        .ok_or_else(|| DeleteItemError::ItemNotFound(id_or_value.to_string()))?;

    let removed = store
        .remove_list_item(target)
        .ok_or_else(|| DeleteItemError::ItemNotFound(id_or_value.to_string()))?;

    storage.save(store)?;

    Ok(removed)
}

#[derive(Debug, Error)]
pub enum DeleteListError {
    #[error("List not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteListResult {
    pub list: CustomList,
    pub removed_items: usize,
}

/// Delete a list and everything inside it: the item documents go first,
/// then the list itself, all within one commit so no orphaned item can
/// survive its parent.
pub fn delete_list(
    store: &mut Store,
    storage: &impl Storage,
    list_id: Uuid,
) -> Result<DeleteListResult, DeleteListError> {
    if store.get_list(list_id).is_none() {
        return Err(DeleteListError::NotFound);
    }

    let removed_items = store.remove_items_of_list(list_id);
    let list = store.remove_list(list_id).ok_or(DeleteListError::NotFound)?;

    storage.save(store)?;

    Ok(DeleteListResult {
        list,
        removed_items,
    })
}
