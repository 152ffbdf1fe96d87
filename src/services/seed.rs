use std::collections::HashMap;
use std::str::FromStr;

use jiff::Timestamp;
use slug::slugify;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        contact::Contact,
        custom_list::{CustomList, ListItem},
        project::{Project, ProjectStatus},
        store::Store,
    },
    storage::{Storage, StorageError},
};

/// How the seed routine decides whether a record already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Skip any collection that already has documents. Fast, but rerunning
    /// after a partial manual cleanup duplicates the survivors' siblings.
    FreshOnly,
    /// Per-record existence checks: contact by email, project by
    /// application number, list by title. Idempotent across reruns.
    Upsert,
}

#[derive(Debug, Error)]
#[error("Unknown seed mode '{0}'. Use fresh-only or upsert")]
pub struct ParseSeedModeError(String);

impl FromStr for SeedMode {
    type Err = ParseSeedModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fresh-only" | "fresh" => Ok(SeedMode::FreshOnly),
            "upsert" => Ok(SeedMode::Upsert),
            _ => Err(ParseSeedModeError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct SeedReport {
    pub lists_created: usize,
    pub items_created: usize,
    pub contacts_created: usize,
    pub projects_created: usize,
    pub skipped: usize,
}

impl SeedReport {
    pub fn created_anything(&self) -> bool {
        self.lists_created + self.items_created + self.contacts_created + self.projects_created > 0
    }
}

struct SeedList {
    title: &'static str,
    description: &'static str,
    items: &'static [&'static str],
}

struct SeedContact {
    first_name: &'static str,
    last_name: &'static str,
    company_name: &'static str,
    role: &'static str,
    contact_type: &'static str,
    phone: &'static str,
    email: &'static str,
    address: &'static str,
    city: &'static str,
    vat_number: &'static str,
    tax_office: &'static str,
    notes: &'static str,
    created_at: &'static str,
}

struct SeedProject {
    title: &'static str,
    description: &'static str,
    application_number: &'static str,
    owner_name: &'static str,
    deadline: &'static str,
    status: ProjectStatus,
    created_at: &'static str,
}

const SEED_LISTS: &[SeedList] = &[
    SeedList {
        title: "Ρόλοι",
        description: "Λίστα με τους διαθέσιμους ρόλους για τις επαφές.",
        items: &[
            "Πελάτης",
            "Συνεργάτης",
            "Προμηθευτής",
            "Λογιστήριο",
            "Δημόσιος Υπάλληλος",
            "Εσωτερικός Χρήστης",
        ],
    },
    SeedList {
        title: "Ειδικότητες",
        description: "Λίστα με τις διαθέσιμες ειδικότητες.",
        items: &[
            "Ιδιώτης",
            "Αρχιτέκτονας",
            "Πολιτικός Μηχανικός",
            "Δικηγόρος",
            "Οικονομολόγος",
            "Υπάλληλος Πολεοδομίας",
            "Υπάλληλος ΔΟΥ",
            "Κατασκευαστής",
            "Λογιστής",
            "Ελεύθερος Επαγγελματίας",
        ],
    },
    SeedList {
        title: "Είδη Προμηθευτών",
        description: "Κατηγορίες υλικών και υπηρεσιών από προμηθευτές.",
        items: &[
            "Κουφώματα",
            "Δομικά Υλικά",
            "Συστήματα Θέρμανσης-Ψύξης",
            "Ηλεκτρολογικό Υλικό",
            "Υδραυλικά",
        ],
    },
    SeedList {
        title: "Κατηγορία Παρέμβασης",
        description: "",
        items: &[
            "Κουφώματα",
            "Θερμομόνωση",
            "Συστήματα Θέρμανσης-Ψύξης",
            "ΖΝΧ",
            "Λοιπές Παρεμβάσεις",
        ],
    },
    SeedList {
        title: "Μονάδες Μέτρησης",
        description: "",
        items: &["€/m²", "€/kW", "€/μονάδα", "€/αίτηση", "τεμ.", "m", "m³", "kWh"],
    },
    SeedList {
        title: "Κατάσταση Έργου",
        description: "Οι κύριες καταστάσεις ενός έργου.",
        items: &["Προσφορά", "Ενεργό", "Ολοκληρωμένο", "Ακυρωμένο"],
    },
];

const SEED_CONTACTS: &[SeedContact] = &[
    SeedContact {
        first_name: "Άγγελος",
        last_name: "Κωνσταντινίδης",
        company_name: "",
        role: "Πελάτης",
        contact_type: "Ιδιώτης",
        phone: "6981234567",
        email: "angelos.konst@gmail.com",
        address: "Μελά Παύλου 30",
        city: "Θεσσαλονίκη",
        vat_number: "012345678",
        tax_office: "Α' Θεσσαλονίκης",
        notes: "Ζητάει προσφορά για ανακαίνιση.",
        created_at: "2024-07-01T10:24:00Z",
    },
    SeedContact {
        first_name: "",
        last_name: "",
        company_name: "MONOPROSOPI PRIMASUN I.K.E.",
        role: "Προμηθευτής",
        contact_type: "Εταιρεία",
        phone: "2310999999",
        email: "info@primasun.gr",
        address: "Βασιλίσσης Όλγας 80",
        city: "Θεσσαλονίκη",
        vat_number: "099912345",
        tax_office: "Δ' Θεσσαλονίκης",
        notes: "Ειδίκευση σε θερμομονώσεις.",
        created_at: "2024-07-10T14:10:00Z",
    },
    SeedContact {
        first_name: "Δέσποινα",
        last_name: "Καψίδου",
        company_name: "",
        role: "Πελάτης",
        contact_type: "Ιδιώτης",
        phone: "",
        email: "despoina.k@gmail.com",
        address: "Ναυαρίνου 12",
        city: "Καβάλα",
        vat_number: "",
        tax_office: "",
        notes: "Έργο ολοκληρωμένο.",
        created_at: "2023-11-19T12:30:00Z",
    },
    SeedContact {
        first_name: "Γεώργιος",
        last_name: "Κυριελίδης",
        company_name: "",
        role: "Συνεργάτης",
        contact_type: "Μηχανικός",
        phone: "6974123456",
        email: "gkyrielidis@engmail.com",
        address: "Στρατηγού Καλλάρη 19",
        city: "Δράμα",
        vat_number: "112233445",
        tax_office: "Δράμας",
        notes: "",
        created_at: "2024-06-18T16:20:00Z",
    },
    SeedContact {
        first_name: "",
        last_name: "",
        company_name: "Ανατολή Εύα Καραγιάννη",
        role: "Πελάτης",
        contact_type: "",
        phone: "",
        email: "karagianni.anatoli@gmail.com",
        address: "Μαρτίου 40",
        city: "Αλεξανδρούπολη",
        vat_number: "113355779",
        tax_office: "Αλεξανδρούπολης",
        notes: "Έχει αιτηθεί για Εξοικονομώ.",
        created_at: "2024-07-10T08:00:00Z",
    },
];

const SEED_PROJECTS: &[SeedProject] = &[
    SeedProject {
        title: "Ανακαίνιση κατοικίας Αγγέλου Κωνσταντινίδη",
        description: "Ολική ανακαίνιση, θερμομόνωση και αντικατάσταση κουφωμάτων.",
        application_number: "61-038111",
        owner_name: "Άγγελος Κωνσταντινίδης",
        deadline: "2025-09-30",
        status: ProjectStatus::Active,
        created_at: "2024-07-10T11:35:00Z",
    },
    SeedProject {
        title: "Ενεργειακή αναβάθμιση κατοικίας Καψίδου",
        description: "Αντικατάσταση κουφωμάτων & τοποθέτηση ηλιακού.",
        application_number: "81-028588",
        owner_name: "Δέσποινα Καψίδου",
        deadline: "2023-11-20",
        status: ProjectStatus::Completed,
        created_at: "2023-10-12T13:10:00Z",
    },
    SeedProject {
        title: "Ανακαίνιση διαμερίσματος PRIMASUN I.K.E.",
        description: "Ενεργειακή αναβάθμιση πολυκατοικίας.",
        application_number: "81-082235",
        owner_name: "MONOPROSOPI PRIMASUN I.K.E.",
        deadline: "2024-02-28",
        status: ProjectStatus::Active,
        created_at: "2024-01-18T10:10:00Z",
    },
    SeedProject {
        title: "Ανακαίνιση κατοικίας Ανατολή Καραγιάννη",
        description: "",
        application_number: "81-058764",
        owner_name: "Ανατολή Εύα Καραγιάννη",
        deadline: "2025-09-30",
        status: ProjectStatus::Offer,
        created_at: "2024-07-01T09:00:00Z",
    },
];

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn timestamp(value: &'static str) -> Timestamp {
    value.parse().expect("seed timestamps are valid RFC 3339")
}

/// Populate the store with the demonstration data set: six pick-lists, five
/// contacts and four projects, the projects linked to their owners through
/// a display-name map built while the contacts are inserted.
pub fn seed(
    store: &mut Store,
    storage: &impl Storage,
    mode: SeedMode,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    // 1. Custom lists
    let seed_lists = match mode {
        SeedMode::FreshOnly => store.lists.is_empty(),
        SeedMode::Upsert => true,
    };
    if seed_lists {
        for seed_list in SEED_LISTS {
            let exists = store.lists.iter().any(|l| l.title == seed_list.title);
            if mode == SeedMode::Upsert && exists {
                report.skipped += 1;
                continue;
            }
            let list = CustomList {
                id: Uuid::new_v4(),
                title: seed_list.title.to_string(),
                slug: slugify(seed_list.title),
                description: optional(seed_list.description),
                created_at: jiff::Timestamp::now(),
            };
            let list_id = list.id;
            store.add_list(list);
            report.lists_created += 1;
            for value in seed_list.items {
                store.add_list_item(ListItem {
                    id: Uuid::new_v4(),
                    list_id,
                    value: value.to_string(),
                    created_at: jiff::Timestamp::now(),
                });
                report.items_created += 1;
            }
        }
    } else {
        report.skipped += SEED_LISTS.len();
    }

    // 2. Contacts, building the display-name → id map as we go. Existing
    // contacts matched by email still land in the map so projects can link
    // to them.
    let mut name_to_id: HashMap<String, Uuid> = HashMap::new();

    let seed_contacts = match mode {
        SeedMode::FreshOnly => store.contacts.is_empty(),
        SeedMode::Upsert => true,
    };
    for seed_contact in SEED_CONTACTS {
        let existing = if seed_contact.email.is_empty() {
            None
        } else {
            store
                .contacts
                .iter()
                .find(|c| c.email == seed_contact.email)
        };

        if let Some(contact) = existing {
            name_to_id.insert(contact.display_name(), contact.id);
            report.skipped += 1;
            continue;
        }

        if !seed_contacts {
            report.skipped += 1;
            continue;
        }

        let contact = Contact {
            id: Uuid::new_v4(),
            first_name: seed_contact.first_name.to_string(),
            last_name: seed_contact.last_name.to_string(),
            company_name: seed_contact.company_name.to_string(),
            role: optional(seed_contact.role),
            contact_type: optional(seed_contact.contact_type),
            phone: seed_contact.phone.to_string(),
            email: seed_contact.email.to_string(),
            address: optional(seed_contact.address),
            city: optional(seed_contact.city),
            vat_number: optional(seed_contact.vat_number),
            tax_office: optional(seed_contact.tax_office),
            notes: optional(seed_contact.notes),
            created_at: timestamp(seed_contact.created_at),
        };
        name_to_id.insert(contact.display_name(), contact.id);
        store.add_contact(contact);
        report.contacts_created += 1;
    }

    // 3. Projects, resolving owners through the map built above
    let seed_projects = match mode {
        SeedMode::FreshOnly => store.projects.is_empty(),
        SeedMode::Upsert => true,
    };
    if seed_projects {
        for seed_project in SEED_PROJECTS {
            let exists = store.projects.iter().any(|p| {
                p.application_number.as_deref() == Some(seed_project.application_number)
            });
            if mode == SeedMode::Upsert && exists {
                report.skipped += 1;
                continue;
            }
            let owner_id = name_to_id.get(seed_project.owner_name).copied();
            store.add_project(Project {
                id: Uuid::new_v4(),
                title: seed_project.title.to_string(),
                description: optional(seed_project.description),
                application_number: Some(seed_project.application_number.to_string()),
                owner_id,
                owner_name: Some(seed_project.owner_name.to_string()),
                deadline: Some(
                    seed_project
                        .deadline
                        .parse()
                        .expect("seed deadlines are valid dates"),
                ),
                status: seed_project.status,
                created_at: timestamp(seed_project.created_at),
            });
            report.projects_created += 1;
        }
    } else {
        report.skipped += SEED_PROJECTS.len();
    }

    if report.created_anything() {
        storage.save(store)?;
    }

    Ok(report)
}
