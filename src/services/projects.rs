use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        project::{Project, ProjectPatch, ProjectStatus},
        store::Store,
    },
    services::contacts::{FindContactError, find_contact, next_after_removal},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CreateProjectError {
    #[error("A project needs a title")]
    MissingTitle,

    #[error("Owner contact '{0}' not found")]
    OwnerNotFound(String),

    #[error("Owner query is ambiguous. Multiple contacts found: {}", .0.join(", "))]
    AmbiguousOwner(Vec<String>),

    #[error("Invalid deadline date '{0}': {1}")]
    InvalidDeadline(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct CreateProjectParameters {
    pub title: String,
    pub description: Option<String>,
    pub application_number: Option<String>,
    /// Fuzzy contact query; resolved to an id plus a display-name snapshot
    pub owner: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<ProjectStatus>,
}

pub fn create_project(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateProjectParameters,
) -> Result<Project, CreateProjectError> {
    if parameters.title.trim().is_empty() {
        return Err(CreateProjectError::MissingTitle);
    }

    // Resolve the owner and copy its display name. The copy is a snapshot:
    // renaming the contact later leaves it stale until `sync-owners` runs.
    let (owner_id, owner_name) = match parameters.owner {
        Some(query) => match find_contact(store, &query) {
            Ok(contact) => (Some(contact.id), Some(contact.display_name())),
            Err(FindContactError::NotFound(q)) => {
                return Err(CreateProjectError::OwnerNotFound(q));
            }
            Err(FindContactError::Ambiguous(names)) => {
                return Err(CreateProjectError::AmbiguousOwner(names));
            }
        },
        None => (None, None),
    };

    let deadline = parse_deadline(parameters.deadline)?;

    let project = Project {
        id: Uuid::new_v4(),
        title: parameters.title,
        description: parameters.description,
        application_number: parameters.application_number,
        owner_id,
        owner_name,
        deadline,
        status: parameters.status.unwrap_or_default(),
        created_at: jiff::Timestamp::now(),
    };

    let created = project.clone();
    store.add_project(project);
    storage.save(store)?;

    Ok(created)
}

fn parse_deadline(deadline: Option<String>) -> Result<Option<Date>, CreateProjectError> {
    match deadline {
        Some(deadline_str) => deadline_str
            .parse::<Date>()
            .map(Some)
            .map_err(|e| CreateProjectError::InvalidDeadline(deadline_str, e.to_string())),
        None => Ok(None),
    }
}

#[derive(Debug, Error)]
pub enum FindProjectError {
    #[error("Project '{0}' not found")]
    NotFound(String),

    #[error("Project query is ambiguous. Multiple projects found: {}", .0.join(", "))]
    Ambiguous(Vec<String>),
}

/// Case-insensitive substring match over title and application number.
pub fn find_project(store: &Store, query: &str) -> Result<Project, FindProjectError> {
    let needle = query.to_lowercase();
    let matching: Vec<&Project> = store
        .projects
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.application_number
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect();

    match matching.len() {
        0 => Err(FindProjectError::NotFound(query.to_string())),
        1 => Ok(matching[0].clone()),
        _ => {
            let titles: Vec<String> = matching.iter().map(|p| p.title.clone()).collect();
            Err(FindProjectError::Ambiguous(titles))
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateProjectError {
    #[error("Project not found")]
    NotFound,

    #[error("Nothing to update: no fields were given")]
    EmptyPatch,

    #[error("A project needs a title")]
    MissingTitle,

    #[error("Owner contact '{0}' not found")]
    OwnerNotFound(String),

    #[error("Owner query is ambiguous. Multiple contacts found: {}", .0.join(", "))]
    AmbiguousOwner(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct UpdateProjectParameters {
    pub patch: ProjectPatch,
    /// New owner as a fuzzy contact query; re-snapshots the display name
    pub owner: Option<String>,
    pub clear_owner: bool,
}

impl UpdateProjectParameters {
    fn is_empty(&self) -> bool {
        self.patch.is_empty() && self.owner.is_none() && !self.clear_owner
    }
}

pub fn update_project(
    store: &mut Store,
    storage: &impl Storage,
    id: Uuid,
    parameters: UpdateProjectParameters,
) -> Result<Project, UpdateProjectError> {
    if parameters.is_empty() {
        return Err(UpdateProjectError::EmptyPatch);
    }

    let project = store.get_project(id).ok_or(UpdateProjectError::NotFound)?;

    let mut updated = project.clone();
    parameters.patch.apply(&mut updated);

    if updated.title.trim().is_empty() {
        return Err(UpdateProjectError::MissingTitle);
    }

    if parameters.clear_owner {
        updated.owner_id = None;
        updated.owner_name = None;
    } else if let Some(query) = parameters.owner {
        match find_contact(store, &query) {
            Ok(contact) => {
                updated.owner_id = Some(contact.id);
                updated.owner_name = Some(contact.display_name());
            }
            Err(FindContactError::NotFound(q)) => {
                return Err(UpdateProjectError::OwnerNotFound(q));
            }
            Err(FindContactError::Ambiguous(names)) => {
                return Err(UpdateProjectError::AmbiguousOwner(names));
            }
        }
    }

    if let Some(slot) = store.get_project_mut(id) {
        *slot = updated.clone();
    }
    storage.save(store)?;

    Ok(updated)
}

#[derive(Debug, Error)]
pub enum DeleteProjectError {
    #[error("Project not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteProjectResult {
    pub project: Project,
    /// The record that takes the deleted one's place in the newest-first
    /// listing, `None` once the list is empty.
    pub next_selected: Option<Project>,
}

pub fn delete_project(
    store: &mut Store,
    storage: &impl Storage,
    id: Uuid,
) -> Result<DeleteProjectResult, DeleteProjectError> {
    let position = store
        .projects_ordered()
        .iter()
        .position(|p| p.id == id)
        .ok_or(DeleteProjectError::NotFound)?;

    let project = store
        .remove_project(id)
        .ok_or(DeleteProjectError::NotFound)?;

    let next_selected = next_after_removal(&store.projects_ordered(), position).cloned();

    storage.save(store)?;

    Ok(DeleteProjectResult {
        project,
        next_selected,
    })
}

#[derive(Debug, Error)]
pub enum SyncOwnersError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Explicit repair pass for the denormalized `owner_name` snapshots: every
/// project whose owner contact still exists gets the contact's current
/// display name copied back in. Returns how many projects were patched.
pub fn sync_owner_names(
    store: &mut Store,
    storage: &impl Storage,
) -> Result<usize, SyncOwnersError> {
    let fresh_names: Vec<(Uuid, String)> = store
        .projects
        .iter()
        .filter_map(|p| {
            let owner_id = p.owner_id?;
            let owner = store.get_contact(owner_id)?;
            let current = owner.display_name();
            if p.owner_name.as_deref() != Some(current.as_str()) {
                Some((p.id, current))
            } else {
                None
            }
        })
        .collect();

    if fresh_names.is_empty() {
        return Ok(0);
    }

    let patched = fresh_names.len();
    for (project_id, name) in fresh_names {
        if let Some(project) = store.get_project_mut(project_id) {
            project.owner_name = Some(name);
        }
    }

    storage.save(store)?;
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::ContactPatch;
    use crate::services::contacts::{CreateContactParameters, create_contact, update_contact};
    use crate::storage::json::JsonFileStorage;

    fn temp_storage(name: &str) -> JsonFileStorage {
        let path =
            std::env::temp_dir().join(format!("ergon-projects-{}-{}.json", name, Uuid::new_v4()));
        JsonFileStorage::new(path)
    }

    fn acme(store: &mut Store, storage: &impl Storage) -> crate::models::contact::Contact {
        create_contact(
            store,
            storage,
            CreateContactParameters {
                company_name: "Acme".to_string(),
                ..CreateContactParameters::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn create_snapshots_owner_display_name() {
        let mut store = Store::default();
        let storage = temp_storage("snapshot");
        let owner = acme(&mut store, &storage);

        let project = create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: "Ανακαίνιση κατοικίας".to_string(),
                owner: Some("Acme".to_string()),
                ..CreateProjectParameters::default()
            },
        )
        .unwrap();

        assert_eq!(project.owner_id, Some(owner.id));
        assert_eq!(project.owner_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn create_rejects_unknown_owner() {
        let mut store = Store::default();
        let storage = temp_storage("unknown-owner");

        let result = create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: "Έργο".to_string(),
                owner: Some("nobody".to_string()),
                ..CreateProjectParameters::default()
            },
        );
        assert!(matches!(result, Err(CreateProjectError::OwnerNotFound(_))));
        assert!(store.projects.is_empty());
    }

    #[test]
    fn create_rejects_bad_deadline() {
        let mut store = Store::default();
        let storage = temp_storage("bad-deadline");

        let result = create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: "Έργο".to_string(),
                deadline: Some("next tuesday".to_string()),
                ..CreateProjectParameters::default()
            },
        );
        assert!(matches!(
            result,
            Err(CreateProjectError::InvalidDeadline(_, _))
        ));
    }

    #[test]
    fn owner_name_snapshot_goes_stale_until_synced() {
        let mut store = Store::default();
        let storage = temp_storage("sync");
        let owner = acme(&mut store, &storage);
        let project = create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: "Έργο".to_string(),
                owner: Some("Acme".to_string()),
                ..CreateProjectParameters::default()
            },
        )
        .unwrap();

        update_contact(
            &mut store,
            &storage,
            owner.id,
            ContactPatch {
                company_name: Some("Acme Renovations".to_string()),
                ..ContactPatch::default()
            },
        )
        .unwrap();

        // The snapshot stays stale after the rename
        assert_eq!(
            store.get_project(project.id).unwrap().owner_name.as_deref(),
            Some("Acme")
        );

        let patched = sync_owner_names(&mut store, &storage).unwrap();
        assert_eq!(patched, 1);
        assert_eq!(
            store.get_project(project.id).unwrap().owner_name.as_deref(),
            Some("Acme Renovations")
        );

        // Second run is a no-op
        assert_eq!(sync_owner_names(&mut store, &storage).unwrap(), 0);
    }

    #[test]
    fn update_owner_re_snapshots_name() {
        let mut store = Store::default();
        let storage = temp_storage("reown");
        acme(&mut store, &storage);
        create_contact(
            &mut store,
            &storage,
            CreateContactParameters {
                first_name: "Δέσποινα".to_string(),
                last_name: "Καψίδου".to_string(),
                ..CreateContactParameters::default()
            },
        )
        .unwrap();

        let project = create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: "Έργο".to_string(),
                owner: Some("Acme".to_string()),
                ..CreateProjectParameters::default()
            },
        )
        .unwrap();

        let updated = update_project(
            &mut store,
            &storage,
            project.id,
            UpdateProjectParameters {
                owner: Some("Καψίδου".to_string()),
                ..UpdateProjectParameters::default()
            },
        )
        .unwrap();

        assert_eq!(updated.owner_name.as_deref(), Some("Δέσποινα Καψίδου"));
    }

    #[test]
    fn delete_falls_back_to_adjacent_project() {
        let mut store = Store::default();
        let storage = temp_storage("fallback");
        for title in ["Πρώτο", "Δεύτερο", "Τρίτο"] {
            create_project(
                &mut store,
                &storage,
                CreateProjectParameters {
                    title: title.to_string(),
                    ..CreateProjectParameters::default()
                },
            )
            .unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        // Newest-first order: Τρίτο, Δεύτερο, Πρώτο. Delete the head.
        let head = store.projects_ordered()[0].clone();
        assert_eq!(head.title, "Τρίτο");

        let result = delete_project(&mut store, &storage, head.id).unwrap();
        assert_eq!(result.next_selected.unwrap().title, "Δεύτερο");
    }

    #[test]
    fn find_matches_application_number() {
        let mut store = Store::default();
        let storage = temp_storage("appnum");
        create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: "Έργο".to_string(),
                application_number: Some("61-038111".to_string()),
                ..CreateProjectParameters::default()
            },
        )
        .unwrap();

        let found = find_project(&store, "61-038").unwrap();
        assert_eq!(found.title, "Έργο");
    }
}
