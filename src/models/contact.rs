use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person or company the practice works with. Individual and company
/// contacts share one shape; the display name decides which half is used.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Contact {
    /// UUID to identify the contact
    pub id: Uuid,
    /// First name (individuals)
    #[serde(default)]
    pub first_name: String,
    /// Last name (individuals)
    #[serde(default)]
    pub last_name: String,
    /// Company name (companies, or the billing entity of an individual)
    #[serde(default)]
    pub company_name: String,
    /// Role of the contact (client, partner, supplier, ...)
    pub role: Option<String>,
    /// Specialty / type (architect, civil engineer, ...)
    pub contact_type: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Greek VAT number (ΑΦΜ)
    pub vat_number: Option<String>,
    /// Tax office (ΔΟΥ)
    pub tax_office: Option<String>,
    pub notes: Option<String>,
    /// When the contact was created
    pub created_at: Timestamp,
}

impl Contact {
    /// First + last name when either is present, else the company name,
    /// else a placeholder dash. Never returns an empty string.
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            full_name
        } else if !self.company_name.trim().is_empty() {
            self.company_name.trim().to_string()
        } else {
            "—".to_string()
        }
    }

    /// Whether the contact has any usable name at all.
    pub fn has_name(&self) -> bool {
        !self.first_name.trim().is_empty()
            || !self.last_name.trim().is_empty()
            || !self.company_name.trim().is_empty()
    }

    /// Sort key for the contact list: last name first, falling back to the
    /// display name so companies interleave with people.
    pub fn sort_key(&self) -> String {
        let last = self.last_name.trim();
        if last.is_empty() {
            self.display_name().to_lowercase()
        } else {
            format!("{} {}", last, self.first_name.trim()).to_lowercase()
        }
    }
}

/// Partial update for a contact. `None` fields are left untouched; optional
/// columns are cleared by patching them to an empty string / `Some("")`.
#[derive(Default)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub contact_type: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub vat_number: Option<String>,
    pub tax_office: Option<String>,
    pub notes: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.company_name.is_none()
            && self.role.is_none()
            && self.contact_type.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.vat_number.is_none()
            && self.tax_office.is_none()
            && self.notes.is_none()
    }

    pub fn apply(&self, contact: &mut Contact) {
        if let Some(v) = &self.first_name {
            contact.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            contact.last_name = v.clone();
        }
        if let Some(v) = &self.company_name {
            contact.company_name = v.clone();
        }
        if let Some(v) = &self.role {
            contact.role = Some(v.clone());
        }
        if let Some(v) = &self.contact_type {
            contact.contact_type = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            contact.phone = v.clone();
        }
        if let Some(v) = &self.email {
            contact.email = v.clone();
        }
        if let Some(v) = &self.address {
            contact.address = Some(v.clone());
        }
        if let Some(v) = &self.city {
            contact.city = Some(v.clone());
        }
        if let Some(v) = &self.vat_number {
            contact.vat_number = Some(v.clone());
        }
        if let Some(v) = &self.tax_office {
            contact.tax_office = Some(v.clone());
        }
        if let Some(v) = &self.notes {
            contact.notes = Some(v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let contact = Contact {
            first_name: "Άγγελος".to_string(),
            last_name: "Κωνσταντινίδης".to_string(),
            company_name: "Κάποια Εταιρεία".to_string(),
            ..Contact::default()
        };
        assert_eq!(contact.display_name(), "Άγγελος Κωνσταντινίδης");
    }

    #[test]
    fn display_name_falls_back_to_company() {
        let contact = Contact {
            company_name: "Acme".to_string(),
            ..Contact::default()
        };
        assert_eq!(contact.display_name(), "Acme");
    }

    #[test]
    fn display_name_is_never_empty() {
        let contact = Contact {
            first_name: "   ".to_string(),
            last_name: String::new(),
            company_name: " ".to_string(),
            ..Contact::default()
        };
        assert_eq!(contact.display_name(), "—");
    }

    #[test]
    fn display_name_handles_single_name_part() {
        let contact = Contact {
            last_name: "Καψίδου".to_string(),
            ..Contact::default()
        };
        assert_eq!(contact.display_name(), "Καψίδου");
    }

    #[test]
    fn patch_leaves_untouched_fields_alone() {
        let mut contact = Contact {
            first_name: "Δέσποινα".to_string(),
            last_name: "Καψίδου".to_string(),
            email: "despoina.k@gmail.com".to_string(),
            ..Contact::default()
        };
        let patch = ContactPatch {
            city: Some("Καβάλα".to_string()),
            ..ContactPatch::default()
        };
        patch.apply(&mut contact);

        assert_eq!(contact.first_name, "Δέσποινα");
        assert_eq!(contact.email, "despoina.k@gmail.com");
        assert_eq!(contact.city.as_deref(), Some("Καβάλα"));
    }
}
