use crate::records::{Incident, Vehicle};
use serde::{Deserialize, Serialize};

/// The three headline numbers on the summary panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetStats {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub open_incidents: usize,
}

impl FleetStats {
    pub fn derive(vehicles: &[Vehicle], incidents: &[Incident]) -> Self {
        FleetStats {
            total_vehicles: vehicles.len(),
            active_vehicles: vehicles
                .iter()
                .filter(|vehicle| vehicle.status.is_active())
                .count(),
            open_incidents: incidents.iter().filter(|incident| incident.is_open()).count(),
        }
    }
}

/// The incidents shown on a vehicle's card: open and resolving to it.
pub fn open_incidents_for<'a>(vehicle_id: &str, incidents: &'a [Incident]) -> Vec<&'a Incident> {
    incidents
        .iter()
        .filter(|incident| incident.is_open() && incident.references(vehicle_id))
        .collect()
}
