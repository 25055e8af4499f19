use async_trait::async_trait;
use safezone_core::{
    CoreResult,
    collaborators::{ContactDirectory, EmergencyContact},
};

/// Fixed contact list used when no contact backend is configured.
#[derive(Debug, Default)]
pub struct DemoContacts;

fn contact(
    id: &str,
    name: &str,
    phone: &str,
    lat: f64,
    lng: f64,
    favorite: bool,
) -> EmergencyContact {
    EmergencyContact {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        lat: Some(lat),
        lng: Some(lng),
        favorite,
    }
}

#[async_trait]
impl ContactDirectory for DemoContacts {
    async fn emergency_contacts(&self) -> CoreResult<Vec<EmergencyContact>> {
        let mut contacts = vec![
            contact("contact-1", "Ana Fiesta", "+51 999111222", -12.1219, -77.0298, true),
            contact("contact-2", "Carlos Guardia", "+51 988222333", -12.142, -77.021, false),
            contact("contact-3", "Lucía Taxi Seguro", "+51 977333444", -12.127, -77.035, true),
            contact("contact-4", "Grupo Roomies", "+51 966444555", -12.055, -77.04, false),
            contact("contact-5", "SafeZone Bot", "+51 955555555", -12.12, -77.028, false),
        ];

        // Stable: favorites first, otherwise list order.
        contacts.sort_by_key(|c| !c.favorite);

        Ok(contacts)
    }
}
