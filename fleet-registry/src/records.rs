use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Bus,
    Scooter,
    Train,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Bus, VehicleType::Scooter, VehicleType::Train];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Bus => "Bus",
            VehicleType::Scooter => "Scooter",
            VehicleType::Train => "Train",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Bus" => Some(VehicleType::Bus),
            "Scooter" => Some(VehicleType::Scooter),
            "Train" => Some(VehicleType::Train),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Active,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "Active",
            VehicleStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, VehicleStatus::Active)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    Traffic,
    Breakdown,
    Weather,
}

impl IncidentType {
    pub const ALL: [IncidentType; 3] = [
        IncidentType::Traffic,
        IncidentType::Breakdown,
        IncidentType::Weather,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Traffic => "Traffic",
            IncidentType::Breakdown => "Breakdown",
            IncidentType::Weather => "Weather",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Traffic" => Some(IncidentType::Traffic),
            "Breakdown" => Some(IncidentType::Breakdown),
            "Weather" => Some(IncidentType::Weather),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentStatus {
    Open,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "Open",
            IncidentStatus::Closed => "Closed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VehicleType,
    pub status: VehicleStatus,
}

/// The backend serves `vehicleId` either as a populated vehicle document or
/// as a bare id string, depending on which endpoint produced the incident.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleRef {
    Populated(Vehicle),
    Id(String),
}

impl VehicleRef {
    pub fn id(&self) -> &str {
        match self {
            VehicleRef::Populated(vehicle) => &vehicle.id,
            VehicleRef::Id(id) => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "_id")]
    pub id: String,
    /// Absent when the referenced vehicle no longer resolves; consumers
    /// filter such incidents out rather than erroring.
    #[serde(rename = "vehicleId", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<VehicleRef>,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    #[serde(default)]
    pub description: String,
    pub status: IncidentStatus,
}

impl Incident {
    pub fn is_open(&self) -> bool {
        matches!(self.status, IncidentStatus::Open)
    }

    /// True when this incident's vehicle reference resolves to `vehicle_id`.
    pub fn references(&self, vehicle_id: &str) -> bool {
        self.vehicle_id
            .as_ref()
            .is_some_and(|reference| reference.id() == vehicle_id)
    }
}

/// `POST /vehicles` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VehicleType,
    pub status: VehicleStatus,
}

impl NewVehicle {
    /// New vehicles start out active.
    pub fn new(name: impl Into<String>, kind: VehicleType) -> Self {
        NewVehicle {
            name: name.into(),
            kind,
            status: VehicleStatus::Active,
        }
    }
}

/// `POST /incidents` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    #[serde(rename = "vehicleId")]
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub description: String,
}

pub fn validate_new_vehicle(vehicle: &NewVehicle) -> Result<(), String> {
    if vehicle.name.trim().is_empty() {
        return Err("Please enter a vehicle name".into());
    }
    Ok(())
}

pub fn validate_incident_report(report: &IncidentReport) -> Result<(), String> {
    if report.vehicle_id.trim().is_empty() {
        return Err("Please select a vehicle".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_incident_with_populated_vehicle() {
        let incident: Incident = serde_json::from_str(
            r#"{
                "_id": "inc-1",
                "vehicleId": {"_id": "veh-1", "name": "Bus 42", "type": "Bus", "status": "Active"},
                "type": "Traffic",
                "description": "stuck at the depot",
                "status": "Open"
            }"#,
        )
        .unwrap();

        assert!(incident.is_open());
        assert!(incident.references("veh-1"));
        assert!(!incident.references("veh-2"));
    }

    #[test]
    fn parses_incident_with_bare_vehicle_id() {
        let incident: Incident = serde_json::from_str(
            r#"{"_id": "inc-2", "vehicleId": "veh-7", "type": "Weather", "status": "Closed"}"#,
        )
        .unwrap();

        assert_eq!(incident.vehicle_id, Some(VehicleRef::Id("veh-7".into())));
        assert!(incident.references("veh-7"));
        assert!(!incident.is_open());
        assert_eq!(incident.description, "");
    }

    #[test]
    fn dangling_vehicle_reference_matches_nothing() {
        let incident: Incident = serde_json::from_str(
            r#"{"_id": "inc-3", "type": "Breakdown", "status": "Open"}"#,
        )
        .unwrap();

        assert_eq!(incident.vehicle_id, None);
        assert!(!incident.references("veh-1"));
    }

    #[test]
    fn new_vehicle_defaults_to_active() {
        let vehicle = NewVehicle::new("Night bus", VehicleType::Bus);
        assert_eq!(vehicle.status, VehicleStatus::Active);
    }

    #[test]
    fn blank_vehicle_name_is_rejected() {
        let vehicle = NewVehicle::new("   ", VehicleType::Scooter);
        assert!(validate_new_vehicle(&vehicle).is_err());
        assert!(validate_new_vehicle(&NewVehicle::new("S-1", VehicleType::Scooter)).is_ok());
    }

    #[test]
    fn missing_vehicle_selection_is_rejected() {
        let report = IncidentReport {
            vehicle_id: String::new(),
            kind: IncidentType::Traffic,
            description: "late again".into(),
        };
        assert!(validate_incident_report(&report).is_err());

        let report = IncidentReport {
            vehicle_id: "veh-1".into(),
            ..report
        };
        assert!(validate_incident_report(&report).is_ok());
    }

    #[test]
    fn report_body_uses_backend_field_names() {
        let report = IncidentReport {
            vehicle_id: "veh-1".into(),
            kind: IncidentType::Breakdown,
            description: "flat tire".into(),
        };
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "vehicleId": "veh-1",
                "type": "Breakdown",
                "description": "flat tire"
            })
        );
    }

    #[test]
    fn new_vehicle_body_uses_backend_field_names() {
        let body = serde_json::to_value(NewVehicle::new("Bus 42", VehicleType::Bus)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "Bus 42", "type": "Bus", "status": "Active"})
        );
    }

    #[test]
    fn enum_parse_roundtrips() {
        for kind in VehicleType::ALL {
            assert_eq!(VehicleType::parse(kind.as_str()), Some(kind));
        }
        for kind in IncidentType::ALL {
            assert_eq!(IncidentType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(VehicleType::parse("Zeppelin"), None);
    }
}
