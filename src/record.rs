//! The field selector and the decoded output record.

use bitflags::bitflags;

/// Returned when the queried IP address text could not be parsed.
pub const INVALID_ADDRESS: &str = "Invalid IP address.";
/// Returned for every string slot when the database handle has no
/// usable file backing it (never opened, or already closed).
pub const INVALID_DATABASE: &str = "Invalid database file.";
/// Returned for a requested attribute the product type does not carry.
pub const UNSUPPORTED: &str =
    "This parameter is unavailable for selected data file. Please upgrade the data file.";

bitflags! {
    /// Selects which attributes [`crate::Database::query`] should
    /// populate. Country is split into two independently selectable
    /// bits because both strings share one on-disk column.
    pub struct Columns: u32 {
        const COUNTRY_SHORT         = 1 << 0;
        const COUNTRY_LONG          = 1 << 1;
        const REGION                = 1 << 2;
        const CITY                  = 1 << 3;
        const ISP                   = 1 << 4;
        const LATITUDE              = 1 << 5;
        const LONGITUDE             = 1 << 6;
        const DOMAIN                = 1 << 7;
        const ZIP_CODE              = 1 << 8;
        const TIME_ZONE             = 1 << 9;
        const NET_SPEED             = 1 << 10;
        const IDD_CODE              = 1 << 11;
        const AREA_CODE             = 1 << 12;
        const WEATHER_STATION_CODE  = 1 << 13;
        const WEATHER_STATION_NAME  = 1 << 14;
        const MCC                   = 1 << 15;
        const MNC                   = 1 << 16;
        const MOBILE_BRAND          = 1 << 17;
        const ELEVATION             = 1 << 18;
        const USAGE_TYPE            = 1 << 19;

        const ALL = Columns::COUNTRY_SHORT.bits
            | Columns::COUNTRY_LONG.bits
            | Columns::REGION.bits
            | Columns::CITY.bits
            | Columns::ISP.bits
            | Columns::LATITUDE.bits
            | Columns::LONGITUDE.bits
            | Columns::DOMAIN.bits
            | Columns::ZIP_CODE.bits
            | Columns::TIME_ZONE.bits
            | Columns::NET_SPEED.bits
            | Columns::IDD_CODE.bits
            | Columns::AREA_CODE.bits
            | Columns::WEATHER_STATION_CODE.bits
            | Columns::WEATHER_STATION_NAME.bits
            | Columns::MCC.bits
            | Columns::MNC.bits
            | Columns::MOBILE_BRAND.bits
            | Columns::ELEVATION.bits
            | Columns::USAGE_TYPE.bits;
    }
}

/// A decoded geolocation record.
///
/// String slots carry one of the placeholder messages
/// ([`INVALID_ADDRESS`], [`INVALID_DATABASE`], [`UNSUPPORTED`]) instead
/// of an empty string when the corresponding bit could not be
/// satisfied, so callers can tell "not requested" apart from "this
/// product type doesn't have it". Float slots (`latitude`, `longitude`,
/// `elevation`) have no placeholder representation and default to `0.0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record {
    pub country_short: String,
    pub country_long: String,
    pub region: String,
    pub city: String,
    pub isp: String,
    pub latitude: f32,
    pub longitude: f32,
    pub domain: String,
    pub zip_code: String,
    pub time_zone: String,
    pub net_speed: String,
    pub idd_code: String,
    pub area_code: String,
    pub weather_station_code: String,
    pub weather_station_name: String,
    pub mcc: String,
    pub mnc: String,
    pub mobile_brand: String,
    pub elevation: f32,
    pub usage_type: String,
}

impl Default for Record {
    fn default() -> Record {
        Record {
            country_short: String::new(),
            country_long: String::new(),
            region: String::new(),
            city: String::new(),
            isp: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            domain: String::new(),
            zip_code: String::new(),
            time_zone: String::new(),
            net_speed: String::new(),
            idd_code: String::new(),
            area_code: String::new(),
            weather_station_code: String::new(),
            weather_station_name: String::new(),
            mcc: String::new(),
            mnc: String::new(),
            mobile_brand: String::new(),
            elevation: 0.0,
            usage_type: String::new(),
        }
    }
}

impl Record {
    /// Every string slot set to `message`; floats left at `0.0`.
    pub(crate) fn placeholder(message: &str) -> Record {
        Record {
            country_short: message.to_string(),
            country_long: message.to_string(),
            region: message.to_string(),
            city: message.to_string(),
            isp: message.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            domain: message.to_string(),
            zip_code: message.to_string(),
            time_zone: message.to_string(),
            net_speed: message.to_string(),
            idd_code: message.to_string(),
            area_code: message.to_string(),
            weather_station_code: message.to_string(),
            weather_station_name: message.to_string(),
            mcc: message.to_string(),
            mnc: message.to_string(),
            mobile_brand: message.to_string(),
            elevation: 0.0,
            usage_type: message.to_string(),
        }
    }
}
