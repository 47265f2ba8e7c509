pub mod check;
pub mod snmp;
pub mod tempager;
