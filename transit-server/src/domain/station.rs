//! Stations (stop points).

/// A station on the network. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Station {
    /// Station name without the " Underground Station" suffix.
    pub fn short_name(&self) -> String {
        self.name.replace(" Underground Station", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_suffix() {
        let station = Station {
            id: "940GZZLUODS".into(),
            name: "Old Street Underground Station".into(),
            lat: 51.5257,
            lon: -0.0882,
        };
        assert_eq!(station.short_name(), "Old Street");
    }

    #[test]
    fn short_name_leaves_other_names_alone() {
        let station = Station {
            id: "910GSHRDHST".into(),
            name: "Shoreditch High Street Rail Station".into(),
            ..Station::default()
        };
        assert_eq!(station.short_name(), "Shoreditch High Street Rail Station");
    }
}
