use std::net::{IpAddr, SocketAddr};

use tracing::debug;

use crate::{
    check::{CheckConfiguration, CheckError},
    snmp::{Oid, Session, Value},
};

// SNMPv2-MIB::sysLocation.0
const LOCATION_OID: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 6, 0];

// Tempager 3E sensor values, in hundredths of a degree Celsius.
const INTERNAL_TEMPERATURE_OID: &[u32] = &[1, 3, 6, 1, 4, 1, 20916, 1, 7, 1, 1, 1, 1, 0];
const EXTERNAL_TEMPERATURE_OID: &[u32] = &[1, 3, 6, 1, 4, 1, 20916, 1, 7, 1, 2, 1, 1, 0];

pub fn oids() -> [Oid; 3] {
    [
        Oid::new_unchecked(LOCATION_OID),
        Oid::new_unchecked(INTERNAL_TEMPERATURE_OID),
        Oid::new_unchecked(EXTERNAL_TEMPERATURE_OID),
    ]
}

pub async fn read_values(
    address: IpAddr,
    config: &CheckConfiguration,
) -> Result<[Value; 3], CheckError> {
    let target = SocketAddr::new(address, config.port);

    let mut session = Session::connect(target, config.session_options())
        .await
        .map_err(CheckError::Connection)?;

    let result = session.get(&oids()).await;
    session.close();

    let [location, internal, external] = result?;
    debug!("Read {location:?}, {internal:?}, {external:?} from {target}");

    Ok([location.value, internal.value, external.value])
}
