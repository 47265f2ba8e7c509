use crate::{check::CheckError, snmp::Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReading {
    pub location: String,

    pub internal_raw: i64,

    pub external_raw: i64,
}

impl DeviceReading {
    pub fn decode(values: [Value; 3]) -> Result<Self, CheckError> {
        let [location, internal, external] = values;

        let Value::OctetString(location) = location else {
            return Err(CheckError::LocationType);
        };

        let Value::Integer(internal_raw) = internal else {
            return Err(CheckError::InternalTempType);
        };

        let Value::Integer(external_raw) = external else {
            return Err(CheckError::ExternalTempType);
        };

        Ok(Self {
            location: String::from_utf8_lossy(&location).into_owned(),
            internal_raw,
            external_raw,
        })
    }

    pub fn report(&self) -> Report {
        Report {
            location: self.location.clone(),
            internal_celsius: decode_temperature(self.internal_raw),
            external_celsius: decode_temperature(self.external_raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub location: String,

    pub internal_celsius: f64,

    pub external_celsius: f64,
}

impl Report {
    pub fn metrics(&self) -> String {
        format!(
            "tempager_internal={:.2}, tempager_external={:.2}",
            self.internal_celsius, self.external_celsius
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{} temperature is {:.2}c | {}",
            self.location,
            self.external_celsius,
            self.metrics()
        )
    }
}

fn decode_temperature(raw: i64) -> f64 {
    raw as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn values(location: Value, internal: Value, external: Value) -> [Value; 3] {
        [location, internal, external]
    }

    #[test]
    fn scales_hundredths() {
        assert_eq!(decode_temperature(3567), 35.67);
        assert_eq!(decode_temperature(-250), -2.5);
        assert_eq!(decode_temperature(0), 0.0);
    }

    #[test]
    fn formats_report() {
        let reading = DeviceReading::decode(values(
            Value::OctetString(b"Server Room".to_vec()),
            Value::Integer(2850),
            Value::Integer(3620),
        ))
        .unwrap();

        let report = reading.report();
        assert_eq!(
            report.metrics(),
            "tempager_internal=28.50, tempager_external=36.20"
        );
        assert_eq!(
            report.summary(),
            "Server Room temperature is 36.20c | tempager_internal=28.50, tempager_external=36.20"
        );
    }

    #[test]
    fn formats_negative_temperatures() {
        let report = DeviceReading {
            location: "Roof".to_string(),
            internal_raw: 105,
            external_raw: -725,
        }
        .report();
        assert_eq!(
            report.summary(),
            "Roof temperature is -7.25c | tempager_internal=1.05, tempager_external=-7.25"
        );
    }

    #[test]
    fn names_the_field_with_the_wrong_type() {
        assert_matches!(
            DeviceReading::decode(values(
                Value::Integer(1),
                Value::Integer(2850),
                Value::Integer(3620),
            )),
            Err(CheckError::LocationType)
        );

        assert_matches!(
            DeviceReading::decode(values(
                Value::OctetString(b"Lab".to_vec()),
                Value::Gauge32(2850),
                Value::Integer(3620),
            )),
            Err(CheckError::InternalTempType)
        );

        assert_matches!(
            DeviceReading::decode(values(
                Value::OctetString(b"Lab".to_vec()),
                Value::Integer(2850),
                Value::NoSuchInstance,
            )),
            Err(CheckError::ExternalTempType)
        );
    }

    #[test]
    fn location_is_checked_first() {
        assert_matches!(
            DeviceReading::decode(values(Value::Null, Value::Null, Value::Null)),
            Err(CheckError::LocationType)
        );
    }

    #[test]
    fn tolerates_non_utf8_locations() {
        let reading = DeviceReading::decode(values(
            Value::OctetString(vec![b'L', 0xff, b'b']),
            Value::Integer(0),
            Value::Integer(0),
        ))
        .unwrap();
        assert_eq!(reading.location, "L\u{fffd}b");
    }
}
