//! The product-type -> column-layout table.
//!
//! The on-disk format gives every database a *product type* byte
//! (1..24) that says which of the 19 optional attributes its rows
//! carry, and at which column. The original driver lineage for this
//! format encodes that as ~19 parallel `[u8; 25]` arrays, one per
//! attribute, indexed by product type. This crate instead keeps one
//! [`ProductSchema`] record per product type (the shape recommended by
//! this format's own redesign notes): a single `[ProductSchema; 25]`
//! table, index 0 unused, indices 1..24 matching the header's
//! `product_type` byte directly.
//!
//! A column index of `0` means the attribute is absent for that
//! product type. A nonzero `k` is the attribute's 1-indexed column
//! number; column 1 is always `ipFrom`, so the attribute's byte offset
//! within the non-`ipFrom` portion of a row is `(k - 2) * 4`.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ProductSchema {
    pub country: u8,
    pub region: u8,
    pub city: u8,
    pub isp: u8,
    pub latitude: u8,
    pub longitude: u8,
    pub domain: u8,
    pub zip_code: u8,
    pub time_zone: u8,
    pub net_speed: u8,
    pub idd_code: u8,
    pub area_code: u8,
    pub weather_station_code: u8,
    pub weather_station_name: u8,
    pub mcc: u8,
    pub mnc: u8,
    pub mobile_brand: u8,
    pub elevation: u8,
    pub usage_type: u8,
}

/// One `ProductSchema` per product type, index 0 unused.
const SCHEMA: [ProductSchema; 25] = [
    // unused
    ProductSchema { country: 0, region: 0, city: 0, isp: 0, latitude: 0, longitude: 0, domain: 0, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT1
    ProductSchema { country: 2, region: 0, city: 0, isp: 0, latitude: 0, longitude: 0, domain: 0, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT2
    ProductSchema { country: 2, region: 0, city: 0, isp: 3, latitude: 0, longitude: 0, domain: 0, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT3
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 0, longitude: 0, domain: 0, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT4
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 0, longitude: 0, domain: 0, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT5
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT6
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 0, longitude: 0, domain: 6, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT7
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT8
    ProductSchema { country: 2, region: 0, city: 0, isp: 3, latitude: 0, longitude: 0, domain: 4, zip_code: 0, time_zone: 0, net_speed: 0, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT9
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 7, time_zone: 8, net_speed: 0, idd_code: 9, area_code: 10, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT10
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 11, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT11
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 7, time_zone: 8, net_speed: 0, idd_code: 9, area_code: 10, weather_station_code: 11, weather_station_name: 12, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT12
    ProductSchema { country: 2, region: 0, city: 0, isp: 3, latitude: 0, longitude: 0, domain: 4, zip_code: 0, time_zone: 0, net_speed: 5, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 6, mnc: 7, mobile_brand: 8, elevation: 0, usage_type: 0 },
    // PT13
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 7, time_zone: 8, net_speed: 0, idd_code: 9, area_code: 10, weather_station_code: 11, weather_station_name: 12, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 0, usage_type: 0 },
    // PT14
    ProductSchema { country: 2, region: 0, city: 0, isp: 3, latitude: 0, longitude: 0, domain: 4, zip_code: 0, time_zone: 0, net_speed: 5, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 6, mnc: 7, mobile_brand: 8, elevation: 0, usage_type: 0 },
    // PT15
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 7, time_zone: 8, net_speed: 0, idd_code: 9, area_code: 10, weather_station_code: 11, weather_station_name: 12, mcc: 13, mnc: 14, mobile_brand: 15, elevation: 0, usage_type: 0 },
    // PT16
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 7, time_zone: 8, net_speed: 0, idd_code: 9, area_code: 10, weather_station_code: 11, weather_station_name: 12, mcc: 13, mnc: 14, mobile_brand: 15, elevation: 0, usage_type: 0 },
    // PT17
    ProductSchema { country: 2, region: 0, city: 0, isp: 3, latitude: 0, longitude: 0, domain: 4, zip_code: 0, time_zone: 0, net_speed: 5, idd_code: 0, area_code: 0, weather_station_code: 0, weather_station_name: 0, mcc: 0, mnc: 0, mobile_brand: 0, elevation: 6, usage_type: 0 },
    // PT18
    ProductSchema { country: 2, region: 3, city: 4, isp: 0, latitude: 5, longitude: 6, domain: 0, zip_code: 7, time_zone: 8, net_speed: 0, idd_code: 9, area_code: 10, weather_station_code: 11, weather_station_name: 12, mcc: 13, mnc: 14, mobile_brand: 15, elevation: 0, usage_type: 16 },
    // PT19
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 0, idd_code: 11, area_code: 12, weather_station_code: 13, weather_station_name: 14, mcc: 15, mnc: 16, mobile_brand: 17, elevation: 0, usage_type: 18 },
    // PT20
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 11, idd_code: 12, area_code: 13, weather_station_code: 14, weather_station_name: 15, mcc: 16, mnc: 17, mobile_brand: 18, elevation: 19, usage_type: 0 },
    // PT21
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 11, idd_code: 12, area_code: 13, weather_station_code: 14, weather_station_name: 15, mcc: 16, mnc: 17, mobile_brand: 18, elevation: 0, usage_type: 19 },
    // PT22
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 0, idd_code: 11, area_code: 12, weather_station_code: 13, weather_station_name: 14, mcc: 15, mnc: 16, mobile_brand: 17, elevation: 18, usage_type: 19 },
    // PT23
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 11, idd_code: 12, area_code: 13, weather_station_code: 14, weather_station_name: 15, mcc: 16, mnc: 17, mobile_brand: 18, elevation: 19, usage_type: 20 },
    // PT24
    ProductSchema { country: 2, region: 3, city: 4, isp: 5, latitude: 6, longitude: 7, domain: 8, zip_code: 9, time_zone: 10, net_speed: 11, idd_code: 12, area_code: 13, weather_station_code: 14, weather_station_name: 15, mcc: 16, mnc: 17, mobile_brand: 18, elevation: 19, usage_type: 20 },
];

/// Looks up the schema for a product type, or an all-absent schema if
/// the byte is out of the supported 1..24 range.
pub(crate) fn schema_for(product_type: u8) -> ProductSchema {
    SCHEMA
        .get(usize::from(product_type))
        .copied()
        .unwrap_or_default()
}

/// Converts a 1-indexed column number into the byte offset within the
/// non-`ipFrom` portion of a row, or `None` if the column is absent
/// (`0`).
pub(crate) fn column_offset(column: u8) -> Option<u32> {
    if column == 0 {
        None
    } else {
        Some((u32::from(column) - 2) * 4)
    }
}
