use std::{fmt, str::FromStr};

use serde::Serialize;

// Road categories as they appear in the municipal incident dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoadType {
    Avenida,
    Calle,
    RutaNacional,
    RutaProvincial,
    Autopista,
    Pasaje,
    Otro,
}

impl RoadType {
    pub fn name(&self) -> &'static str {
        match self {
            RoadType::Avenida => "avenida",
            RoadType::Calle => "calle",
            RoadType::RutaNacional => "ruta_nacional",
            RoadType::RutaProvincial => "ruta_provincial",
            RoadType::Autopista => "autopista",
            RoadType::Pasaje => "pasaje",
            RoadType::Otro => "otro",
        }
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Spaces and underscores are used interchangeably in the raw exports
        let normalized = s.trim().to_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "avenida" | "av" | "av." => Ok(RoadType::Avenida),
            "calle" => Ok(RoadType::Calle),
            "ruta_nacional" | "rn" => Ok(RoadType::RutaNacional),
            "ruta_provincial" | "rp" => Ok(RoadType::RutaProvincial),
            "autopista" | "autovia" | "autovía" => Ok(RoadType::Autopista),
            "pasaje" => Ok(RoadType::Pasaje),
            "otro" | "otra" => Ok(RoadType::Otro),
            _ => Err(format!("Failed to parse road type '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_road_types() {
        assert_eq!("Avenida".parse::<RoadType>(), Ok(RoadType::Avenida));
        assert_eq!("ruta nacional".parse::<RoadType>(), Ok(RoadType::RutaNacional));
        assert_eq!(" RP ".parse::<RoadType>(), Ok(RoadType::RutaProvincial));
        assert!("sendero".parse::<RoadType>().is_err());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for road_type in [
            RoadType::Avenida,
            RoadType::Calle,
            RoadType::RutaNacional,
            RoadType::RutaProvincial,
            RoadType::Autopista,
            RoadType::Pasaje,
            RoadType::Otro,
        ] {
            assert_eq!(road_type.to_string().parse::<RoadType>(), Ok(road_type));
        }
    }
}
