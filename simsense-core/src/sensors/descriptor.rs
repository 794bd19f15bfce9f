//! Sensor descriptors: names, units and tags for labelling measurements.
//!
//! Data only. Rendering collaborators turn these into axis labels and point
//! annotations; the measurement pipeline never reads them.

/// What a sensor array measures and how to label it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorDescriptor {
    /// Quantity name, e.g. "Temperature"
    pub name: String,
    /// Measurement units
    pub units: String,
    /// Quantity symbol
    pub symbol: String,
    /// Prefix for per-sensor tags
    pub tag: String,
    /// Component suffixes in measurement order, empty for scalars
    pub components: Vec<String>,
}

impl Default for SensorDescriptor {
    fn default() -> Self {
        Self {
            name: "Measured Value".to_string(),
            units: "-".to_string(),
            symbol: "m".to_string(),
            tag: "S".to_string(),
            components: Vec::new(),
        }
    }
}

impl SensorDescriptor {
    /// Thermocouple preset
    pub fn temperature() -> Self {
        Self {
            name: "Temperature".to_string(),
            units: "°C".to_string(),
            symbol: "T".to_string(),
            tag: "TC".to_string(),
            components: Vec::new(),
        }
    }

    /// Displacement sensor preset
    pub fn displacement() -> Self {
        Self {
            name: "Displacement".to_string(),
            units: "mm".to_string(),
            symbol: "u".to_string(),
            tag: "DS".to_string(),
            components: ["x", "y", "z"].iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Strain gauge preset, components ordered normal then shear
    pub fn strain(spat_dim: usize) -> Self {
        let components: &[&str] = if spat_dim == 2 {
            &["xx", "yy", "xy"]
        } else {
            &["xx", "yy", "zz", "xy", "yz", "xz"]
        };
        Self {
            name: "Strain".to_string(),
            units: "-".to_string(),
            symbol: "e".to_string(),
            tag: "SG".to_string(),
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Axis label for one component, e.g. "Displacement u_x [mm]"
    pub fn create_label(&self, comp_ind: usize) -> String {
        match self.components.get(comp_ind) {
            Some(comp) => format!("{} {}_{} [{}]", self.name, self.symbol, comp, self.units),
            None => format!("{} {} [{}]", self.name, self.symbol, self.units),
        }
    }

    /// Tags "TC1".."TCn", zero-padded to the width of `num_sensors`
    pub fn create_sensor_tags(&self, num_sensors: usize) -> Vec<String> {
        let width = num_sensors.to_string().len();
        (1..=num_sensors)
            .map(|i| format!("{}{:0width$}", self.tag, i, width = width))
            .collect()
    }
}
