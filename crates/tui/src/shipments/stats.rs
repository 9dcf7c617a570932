use api_types::shipment::{Shipment, ShipmentType};

/// Aggregates over the whole, unfiltered collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentStats {
    pub total_shipments: usize,
    pub delivered: usize,
    pub total_cost: f64,
    pub avg_cost: f64,
    pub by_type: [(ShipmentType, usize); 3],
}

impl ShipmentStats {
    pub fn from_shipments(shipments: &[Shipment]) -> Self {
        let total_cost: f64 = shipments.iter().map(|s| s.cost).sum();
        let total_shipments = shipments.len();
        let avg_cost = if total_shipments == 0 {
            0.0
        } else {
            total_cost / total_shipments as f64
        };
        let by_type = ShipmentType::ALL.map(|kind| {
            let count = shipments.iter().filter(|s| s.shipment_type == kind).count();
            (kind, count)
        });

        Self {
            total_shipments,
            delivered: shipments.iter().filter(|s| s.is_delivered).count(),
            total_cost,
            avg_cost,
            by_type,
        }
    }

    pub fn in_transit(&self) -> usize {
        self.total_shipments - self.delivered
    }

    /// Percentage in `0..=100`.
    pub fn delivery_rate(&self) -> f64 {
        if self.total_shipments == 0 {
            return 0.0;
        }
        self.delivered as f64 * 100.0 / self.total_shipments as f64
    }
}
