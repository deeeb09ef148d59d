//! Read-only lookup engine over IP2Location BIN geolocation databases.
//!
//! Given a textual IP address and a [`Columns`] selection, [`Database::query`]
//! returns the [`Record`] whose range covers that address: it parses the
//! fixed-width header, resolves the column layout from the database's
//! *product type*, remaps IPv4-mapped/6to4/Teredo IPv6 forms onto the v4
//! section, binary-searches the sorted range table (optionally narrowed by a
//! first-octet index) and decodes only the requested, available columns.
//!
//! The engine is generic over the byte source ([`ReadAt`]): [`RandomAccessFile`]
//! for file-backed databases, [`MemorySource`] for a fully buffered
//! alternative. Once opened a [`Database`] is immutable, so concurrent
//! queries from multiple threads are safe as long as the byte source itself
//! supports concurrent positional reads (both provided sources do).

#![forbid(unsafe_code)]

use std::path::Path;

use byteorder::{ReadBytesExt as _, LE};
use positioned_io::ReadBytesAtExt as _;
use tracing::{debug, trace};

pub mod error;
pub mod record;
pub mod source;

mod address;
mod primitive;
mod schema;

pub use error::{Error, Result};
pub use record::{Columns, Record, INVALID_ADDRESS, INVALID_DATABASE, UNSUPPORTED};
pub use source::{MemorySource, RandomAccessFile, ReadAt};

use address::NormalizedAddress;
use schema::ProductSchema;

/// Returns this crate's API version, mirroring the source driver lineage's
/// own `api_version()` entry point.
pub const fn api_version() -> &'static str {
    "8.4.0"
}

/// 5 single-byte fields (product type, column count, y/m/d) plus 6 `u32`
/// fields (v4/v6 row counts, section addrs, index addrs) — 29 bytes total.
/// spec.md's own offset table places the last field, `v6IndexAddr`, at
/// 1-indexed offset 26 with width 4, ending at byte 29; its prose calling
/// the header "26 bytes" is imprecise about that trailing field's width.
const HEADER_LEN: usize = 5 * 1 + 6 * 4;

/// The fixed header at the start of every database file (spec.md §3).
struct Header {
    product_type: u8,
    column_count: u8,
    v4_row_count: u32,
    v4_section_addr: u32,
    v6_row_count: u32,
    v6_section_addr: u32,
    v4_index_addr: u32,
    v6_index_addr: u32,
}

impl Header {
    fn read<B: ReadAt>(src: &B) -> Result<Header> {
        let mut buf = [0u8; HEADER_LEN];
        src.read_exact_at(0, &mut buf)?;
        let mut cursor = &buf[..];
        let product_type = cursor.read_u8()?;
        let column_count = cursor.read_u8()?;
        let _year = cursor.read_u8()?;
        let _month = cursor.read_u8()?;
        let _day = cursor.read_u8()?;
        Ok(Header {
            product_type,
            column_count,
            v4_row_count: cursor.read_u32::<LE>()?,
            v4_section_addr: cursor.read_u32::<LE>()?,
            v6_row_count: cursor.read_u32::<LE>()?,
            v6_section_addr: cursor.read_u32::<LE>()?,
            v4_index_addr: cursor.read_u32::<LE>()?,
            v6_index_addr: cursor.read_u32::<LE>()?,
        })
    }
}

/// Rejects a column count too small to derive a row stride from.
///
/// Mirrors the teacher's `validate_columns`: a v6 row's stride is
/// `16 + (column_count - 1) * 4`, which underflows for `column_count == 0`.
/// Unlike the teacher, there is no upper bound here — spec.md §4.4 accepts
/// any product type in 1..24 and leaves unsupported attributes to the schema
/// fallback rather than rejecting the header outright.
fn validate_column_count(column_count: u8) -> Result<u32> {
    if column_count < 1 {
        return Err(Error::InvalidHeader("column count must be at least 1"));
    }
    Ok(u32::from(column_count))
}

/// Resolved, immutable per-file layout: row strides and the product type's
/// column schema (spec.md §4.4).
struct Metadata {
    schema: ProductSchema,
    v4_row_count: u32,
    v4_section_addr: u32,
    v4_index_addr: u32,
    v4_stride: u32,
    v6_row_count: u32,
    v6_section_addr: u32,
    v6_index_addr: u32,
    v6_stride: u32,
}

impl Metadata {
    fn load<B: ReadAt>(src: &B) -> Result<Metadata> {
        let header = Header::read(src)?;
        let column_count = validate_column_count(header.column_count)?;
        let v4_stride = column_count * 4;
        let v6_stride = 16 + (column_count - 1) * 4;

        debug!(
            product_type = header.product_type,
            column_count = header.column_count,
            v4_rows = header.v4_row_count,
            v6_rows = header.v6_row_count,
            "loaded database metadata"
        );

        Ok(Metadata {
            schema: schema::schema_for(header.product_type),
            v4_row_count: header.v4_row_count,
            v4_section_addr: header.v4_section_addr,
            v4_index_addr: header.v4_index_addr,
            v4_stride,
            v6_row_count: header.v6_row_count,
            v6_section_addr: header.v6_section_addr,
            v6_index_addr: header.v6_index_addr,
            v6_stride,
        })
    }
}

/// An opened, immutable handle over an IP2Location BIN database.
///
/// Construct with [`Database::open`] (file-backed) or
/// [`Database::open_with_memory`]/[`Database::open_with_source`] (any other
/// [`ReadAt`] byte source). `B` is the byte source type; the engine itself
/// does not care whether it reads from a file or a heap buffer.
pub struct Database<B: ReadAt> {
    source: Option<B>,
    metadata: Metadata,
}

impl Database<RandomAccessFile> {
    /// Opens a file-backed database and loads its metadata.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Database<RandomAccessFile>> {
        let raf = RandomAccessFile::open(path)?;
        Database::open_with_source(raf)
    }
}

impl Database<MemorySource> {
    /// Opens a database already held fully in memory.
    pub fn open_with_memory(bytes: Vec<u8>) -> Result<Database<MemorySource>> {
        Database::open_with_source(MemorySource::new(bytes))
    }
}

impl<B: ReadAt> Database<B> {
    /// Opens a database over any [`ReadAt`] byte source.
    pub fn open_with_source(source: B) -> Result<Database<B>> {
        let metadata = Metadata::load(&source)?;
        Ok(Database {
            source: Some(source),
            metadata,
        })
    }

    /// Looks up `ip` and decodes the attributes selected by `columns`.
    ///
    /// Never fails for an unparseable address or an attribute the product
    /// type does not carry; those are signaled in-band via the placeholder
    /// strings in [`record`]. Fails with [`Error::Closed`] if the handle has
    /// already been closed, and with [`Error::Io`] if the byte source fails.
    pub fn query(&self, ip: &str, columns: Columns) -> Result<Record> {
        let source = self.source.as_ref().ok_or(Error::Closed)?;

        match address::normalize(ip) {
            NormalizedAddress::Invalid => Ok(Record::placeholder(INVALID_ADDRESS)),
            addr => match lookup_row(source, &self.metadata, addr)? {
                Some(row) => assemble(source, &self.metadata.schema, &row, columns),
                None => Ok(Record::default()),
            },
        }
    }

    /// Releases the byte source. Idempotent; further queries fail with
    /// [`Error::Closed`].
    pub fn close(&mut self) {
        self.source = None;
    }
}

/// Section parameters the binary search needs, resolved once per query by
/// address kind (spec.md §4.6 step 1).
struct Section {
    base_addr: u64,
    stride: u64,
    row_count: u64,
    index_addr: u32,
    first_col_width: u64,
}

fn section_for(metadata: &Metadata, addr: NormalizedAddress) -> Section {
    match addr {
        NormalizedAddress::V4(_) => Section {
            base_addr: u64::from(metadata.v4_section_addr),
            stride: u64::from(metadata.v4_stride),
            row_count: u64::from(metadata.v4_row_count),
            index_addr: metadata.v4_index_addr,
            first_col_width: 4,
        },
        NormalizedAddress::V6(_) => Section {
            base_addr: u64::from(metadata.v6_section_addr),
            stride: u64::from(metadata.v6_stride),
            row_count: u64::from(metadata.v6_row_count),
            index_addr: metadata.v6_index_addr,
            first_col_width: 16,
        },
        NormalizedAddress::Invalid => unreachable!("invalid addresses are filtered out before lookup"),
    }
}

fn read_ip_pair<B: ReadAt>(src: &B, row_start: u64, stride: u64, addr: NormalizedAddress) -> Result<(u128, u128)> {
    Ok(match addr {
        NormalizedAddress::V4(_) => (
            u128::from(primitive::read_u32_1indexed(src, row_start)?),
            u128::from(primitive::read_u32_1indexed(src, row_start + stride)?),
        ),
        NormalizedAddress::V6(_) => (
            primitive::read_u128_1indexed(src, row_start)?,
            primitive::read_u128_1indexed(src, row_start + stride)?,
        ),
        NormalizedAddress::Invalid => unreachable!("invalid addresses are filtered out before lookup"),
    })
}

/// Binary search over the sorted (ipFrom, ipTo) range table (spec.md §4.6).
///
/// Returns the matched row's non-`ipFrom` bytes, ready for [`assemble`], or
/// `None` if no row covers `addr` (not expected for a well-formed database,
/// but not treated as an error either).
fn lookup_row<B: ReadAt>(src: &B, metadata: &Metadata, addr: NormalizedAddress) -> Result<Option<Vec<u8>>> {
    let section = section_for(metadata, addr);
    if section.row_count == 0 {
        return Ok(None);
    }

    let mut a: u128 = match addr {
        NormalizedAddress::V4(num) => u128::from(num),
        NormalizedAddress::V6(num) => num,
        NormalizedAddress::Invalid => unreachable!("invalid addresses are filtered out before lookup"),
    };
    let max_ip: u128 = match addr {
        NormalizedAddress::V4(_) => u128::from(address::MAX_IPV4),
        NormalizedAddress::V6(_) => address::MAX_IPV6,
        NormalizedAddress::Invalid => unreachable!("invalid addresses are filtered out before lookup"),
    };

    let mut low: u64 = 0;
    let mut high: u64 = section.row_count;

    if section.index_addr != 0 {
        if let Some(prefix) = addr.index_prefix() {
            let index_offset = u64::from(section.index_addr) + (u64::from(prefix) << 3);
            low = u64::from(primitive::read_u32_1indexed(src, index_offset)?);
            high = u64::from(primitive::read_u32_1indexed(src, index_offset + 4)?);
        }
    }

    // Defensive last-row rule: the maximum address would otherwise compare
    // equal to (and thus miss) the half-open upper bound of the final row.
    if a >= max_ip {
        a -= 1;
    }

    while low <= high {
        let mid = low + (high - low) / 2;
        let row_start = section.base_addr + mid * section.stride;

        let (ip_from, ip_to) = read_ip_pair(src, row_start, section.stride, addr)?;
        trace!(mid, ip_from, ip_to, "probed row");

        if ip_from <= a && a < ip_to {
            let row_len = section.stride - section.first_col_width;
            let mut buf = vec![0u8; row_len as usize];
            src.read_exact_at(row_start - 1 + section.first_col_width, &mut buf)?;
            return Ok(Some(buf));
        } else if a < ip_from {
            if mid == 0 {
                break;
            }
            high = mid - 1;
        } else {
            low = mid + 1;
        }
    }

    Ok(None)
}

/// Reads a string column that is requested and enabled, `""` if not
/// requested, or [`UNSUPPORTED`] if requested but absent from the schema.
fn read_string_column<B: ReadAt>(src: &B, row: &[u8], column: u8, requested: bool) -> Result<String> {
    if !requested {
        return Ok(String::new());
    }
    match schema::column_offset(column) {
        Some(offset) => {
            let ptr = u64::from(primitive::read_u32_row(row, offset as usize));
            primitive::read_str_at_ptr(src, ptr)
        }
        None => Ok(UNSUPPORTED.to_string()),
    }
}

/// Reads the two country fields, which share a single pointer column: the
/// short (ISO-3166) code at the pointer, the long name at `pointer + 3`.
fn read_country<B: ReadAt>(
    src: &B,
    row: &[u8],
    column: u8,
    want_short: bool,
    want_long: bool,
) -> Result<(String, String)> {
    if !want_short && !want_long {
        return Ok((String::new(), String::new()));
    }
    match schema::column_offset(column) {
        Some(offset) => {
            let ptr = u64::from(primitive::read_u32_row(row, offset as usize));
            let short = if want_short {
                primitive::read_str_at_ptr(src, ptr)?
            } else {
                String::new()
            };
            let long = if want_long {
                primitive::read_str_at_ptr(src, ptr + 3)?
            } else {
                String::new()
            };
            Ok((short, long))
        }
        None => Ok((
            if want_short { UNSUPPORTED.to_string() } else { String::new() },
            if want_long { UNSUPPORTED.to_string() } else { String::new() },
        )),
    }
}

/// Reads a float column (latitude/longitude) decoded directly from the row,
/// no pointer indirection.
fn read_float_column(row: &[u8], column: u8, requested: bool) -> f32 {
    if !requested {
        return 0.0;
    }
    match schema::column_offset(column) {
        Some(offset) => primitive::read_f32_row(row, offset as usize),
        None => 0.0,
    }
}

/// Reads elevation: a pointed decimal string parsed to `f32`. A malformed
/// string silently yields `0.0` (spec.md §9 "Open question — elevation
/// parse failure").
fn read_elevation<B: ReadAt>(src: &B, row: &[u8], column: u8, requested: bool) -> Result<f32> {
    if !requested {
        return Ok(0.0);
    }
    match schema::column_offset(column) {
        Some(offset) => {
            let ptr = u64::from(primitive::read_u32_row(row, offset as usize));
            let text = primitive::read_str_at_ptr(src, ptr)?;
            Ok(text.trim().parse().unwrap_or(0.0))
        }
        None => Ok(0.0),
    }
}

/// Decodes a matched row into a [`Record`], honoring both `columns` and the
/// schema's enable flags (spec.md §4.7).
fn assemble<B: ReadAt>(src: &B, schema: &ProductSchema, row: &[u8], columns: Columns) -> Result<Record> {
    let (country_short, country_long) = read_country(
        src,
        row,
        schema.country,
        columns.contains(Columns::COUNTRY_SHORT),
        columns.contains(Columns::COUNTRY_LONG),
    )?;

    Ok(Record {
        country_short,
        country_long,
        region: read_string_column(src, row, schema.region, columns.contains(Columns::REGION))?,
        city: read_string_column(src, row, schema.city, columns.contains(Columns::CITY))?,
        isp: read_string_column(src, row, schema.isp, columns.contains(Columns::ISP))?,
        latitude: read_float_column(row, schema.latitude, columns.contains(Columns::LATITUDE)),
        longitude: read_float_column(row, schema.longitude, columns.contains(Columns::LONGITUDE)),
        domain: read_string_column(src, row, schema.domain, columns.contains(Columns::DOMAIN))?,
        zip_code: read_string_column(src, row, schema.zip_code, columns.contains(Columns::ZIP_CODE))?,
        time_zone: read_string_column(src, row, schema.time_zone, columns.contains(Columns::TIME_ZONE))?,
        net_speed: read_string_column(src, row, schema.net_speed, columns.contains(Columns::NET_SPEED))?,
        idd_code: read_string_column(src, row, schema.idd_code, columns.contains(Columns::IDD_CODE))?,
        area_code: read_string_column(src, row, schema.area_code, columns.contains(Columns::AREA_CODE))?,
        weather_station_code: read_string_column(
            src,
            row,
            schema.weather_station_code,
            columns.contains(Columns::WEATHER_STATION_CODE),
        )?,
        weather_station_name: read_string_column(
            src,
            row,
            schema.weather_station_name,
            columns.contains(Columns::WEATHER_STATION_NAME),
        )?,
        mcc: read_string_column(src, row, schema.mcc, columns.contains(Columns::MCC))?,
        mnc: read_string_column(src, row, schema.mnc, columns.contains(Columns::MNC))?,
        mobile_brand: read_string_column(src, row, schema.mobile_brand, columns.contains(Columns::MOBILE_BRAND))?,
        elevation: read_elevation(src, row, schema.elevation, columns.contains(Columns::ELEVATION))?,
        usage_type: read_string_column(src, row, schema.usage_type, columns.contains(Columns::USAGE_TYPE))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal DB1 (country-only) file with two v4 rows plus the
    /// trailing sentinel row the binary search's upper bound relies on, and
    /// an empty v6 section.
    fn build_db1() -> (Vec<u8>, u32, u32) {
        let mut heap = Vec::new();
        let heap_start = HEADER_LEN as u32 + 3 * 8; // 3 physical v4 rows, stride 8

        let push = |s: &str, heap: &mut Vec<u8>| -> u32 {
            let ptr = heap_start + heap.len() as u32;
            heap.push(s.len() as u8);
            heap.extend_from_slice(s.as_bytes());
            ptr
        };

        let zz_short = push("ZZ", &mut heap);
        push("Unknown Land", &mut heap);
        let us_short = push("US", &mut heap);
        push("United States of America", &mut heap);

        let mut rows = Vec::new();
        rows.extend_from_slice(&0u32.to_le_bytes());
        rows.extend_from_slice(&zz_short.to_le_bytes());
        rows.extend_from_slice(&0x0800_0000u32.to_le_bytes());
        rows.extend_from_slice(&us_short.to_le_bytes());
        rows.extend_from_slice(&u32::MAX.to_le_bytes());
        rows.extend_from_slice(&0u32.to_le_bytes());

        let mut file = Vec::new();
        // header
        file.push(1); // product type: DB1
        file.push(2); // column count
        file.push(24); // year
        file.push(1); // month
        file.push(1); // day
        file.extend_from_slice(&2u32.to_le_bytes()); // v4 row count
        file.extend_from_slice(&(HEADER_LEN as u32 + 1).to_le_bytes()); // v4 section addr (1-indexed)
        file.extend_from_slice(&0u32.to_le_bytes()); // v6 row count
        file.extend_from_slice(&(HEADER_LEN as u32 + 1).to_le_bytes()); // v6 section addr (unused)
        file.extend_from_slice(&0u32.to_le_bytes()); // v4 index addr
        file.extend_from_slice(&0u32.to_le_bytes()); // v6 index addr

        assert_eq!(file.len(), HEADER_LEN);
        file.extend_from_slice(&rows);
        assert_eq!(file.len(), heap_start as usize);
        file.extend_from_slice(&heap);

        (file, us_short, zz_short)
    }

    #[test]
    fn query_resolves_country_for_matching_row() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("8.8.8.8", Columns::ALL).unwrap();
        assert_eq!(rec.country_short, "US");
        assert_eq!(rec.country_long, "United States of America");
    }

    #[test]
    fn query_boundary_address_is_decremented() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("255.255.255.255", Columns::ALL).unwrap();
        assert_eq!(rec.country_short, "US");
    }

    #[test]
    fn query_invalid_address_yields_placeholder() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("not-an-ip", Columns::ALL).unwrap();
        assert_eq!(rec.country_short, INVALID_ADDRESS);
        assert_eq!(rec.region, INVALID_ADDRESS);
    }

    #[test]
    fn query_unsupported_attribute_on_db1() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("8.8.8.8", Columns::ALL).unwrap();
        assert_eq!(rec.region, UNSUPPORTED);
        assert_eq!(rec.isp, UNSUPPORTED);
        assert_eq!(rec.latitude, 0.0);
    }

    #[test]
    fn query_field_mask_isolates_unrequested_slots() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("8.8.8.8", Columns::COUNTRY_SHORT).unwrap();
        assert_eq!(rec.country_short, "US");
        assert_eq!(rec.country_long, "");
        assert_eq!(rec.region, "");
    }

    #[test]
    fn query_with_no_v6_section_is_not_found() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("2001:4860:4860::8888", Columns::ALL).unwrap();
        assert_eq!(rec, Record::default());
    }

    #[test]
    fn query_is_idempotent() {
        let (bytes, ..) = build_db1();
        let db = Database::open_with_memory(bytes).unwrap();
        let a = db.query("8.8.8.8", Columns::ALL).unwrap();
        let b = db.query("8.8.8.8", Columns::ALL).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn query_after_close_fails() {
        let (bytes, ..) = build_db1();
        let mut db = Database::open_with_memory(bytes).unwrap();
        db.close();
        db.close(); // double close is harmless
        assert!(matches!(db.query("8.8.8.8", Columns::ALL), Err(Error::Closed)));
    }

    #[test]
    fn out_of_range_product_type_degrades_to_unsupported() {
        // spec.md §4.4: no magic-number validation on product type. An
        // out-of-range value still opens and queries successfully; the
        // schema fallback just reports every attribute as UNSUPPORTED.
        let (mut bytes, ..) = build_db1();
        bytes[0] = 0; // product type 0 is out of range (valid range is 1..24)
        let db = Database::open_with_memory(bytes).unwrap();
        let rec = db.query("8.8.8.8", Columns::ALL).unwrap();
        assert_eq!(rec.country_short, UNSUPPORTED);
        assert_eq!(rec.country_long, UNSUPPORTED);
        assert_eq!(rec.region, UNSUPPORTED);
        assert_eq!(rec.latitude, 0.0);
    }

    #[test]
    fn zero_column_count_is_rejected() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0] = 1; // product type: DB1
        bytes[1] = 0; // column count 0 would underflow the v6 stride formula
        let err = Database::open_with_memory(bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }
}
