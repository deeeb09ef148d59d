use ip2location_bin::{Columns, Database};

const V4_STRIDE: usize = 80; // 20 columns * 4 bytes
const V6_STRIDE: usize = 92; // 16 + 19 * 4 bytes
const HEADER_LEN: usize = 5 * 1 + 6 * 4; // product type/columns/y/m/d + 6 u32 fields

/// Appends a length-prefixed string to `heap` and returns its absolute file
/// offset (the pointer value a row stores for it).
fn push_str(heap: &mut Vec<u8>, heap_start: u32, s: &str) -> u32 {
    let ptr = heap_start + heap.len() as u32;
    heap.push(s.len() as u8);
    heap.extend_from_slice(s.as_bytes());
    ptr
}

fn put_u32(row: &mut [u8], offset: usize, value: u32) {
    row[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(row: &mut [u8], offset: usize, value: f32) {
    row[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Builds a single-row-per-section DB24 (every attribute present) database
/// covering the whole v4 and v6 address spaces, so any address lands in the
/// same row. Good enough to exercise the full column schema and the v4/v6
/// IPv4-embedding remap paths without needing a real on-disk file.
fn build_db24() -> Vec<u8> {
    let v4_rows_bytes = 2 * V4_STRIDE; // one data row + sentinel
    let v6_rows_bytes = 2 * V6_STRIDE;
    let heap_start = (HEADER_LEN + v4_rows_bytes + v6_rows_bytes) as u32;

    let mut heap = Vec::new();
    let country_short = push_str(&mut heap, heap_start, "US");
    push_str(&mut heap, heap_start, "United States of America");
    let region = push_str(&mut heap, heap_start, "California");
    let city = push_str(&mut heap, heap_start, "Mountain View");
    let isp = push_str(&mut heap, heap_start, "Google LLC");
    let elevation = push_str(&mut heap, heap_start, "32.0");
    let usage_type = push_str(&mut heap, heap_start, "DCH");

    let mut v4_row = vec![0u8; V4_STRIDE - 4];
    put_u32(&mut v4_row, 0, country_short); // col2 country, offset 0
    put_u32(&mut v4_row, 4, region); // col3
    put_u32(&mut v4_row, 8, city); // col4
    put_u32(&mut v4_row, 12, isp); // col5
    put_f32(&mut v4_row, 16, 37.386); // col6 latitude
    put_f32(&mut v4_row, 20, -122.084); // col7 longitude
    put_u32(&mut v4_row, 68, elevation); // col19 elevation
    put_u32(&mut v4_row, 72, usage_type); // col20 usage type

    let mut v4_rows = Vec::new();
    v4_rows.extend_from_slice(&0u32.to_le_bytes());
    v4_rows.extend_from_slice(&v4_row);
    v4_rows.extend_from_slice(&u32::MAX.to_le_bytes());
    v4_rows.extend_from_slice(&vec![0u8; V4_STRIDE - 4]);
    assert_eq!(v4_rows.len(), v4_rows_bytes);

    let mut v6_row = vec![0u8; V6_STRIDE - 16];
    put_u32(&mut v6_row, 0, country_short);
    put_u32(&mut v6_row, 4, region);
    put_u32(&mut v6_row, 8, city);
    put_u32(&mut v6_row, 12, isp);
    put_f32(&mut v6_row, 16, 37.386);
    put_f32(&mut v6_row, 20, -122.084);
    put_u32(&mut v6_row, 68, elevation);
    put_u32(&mut v6_row, 72, usage_type);

    let mut v6_rows = Vec::new();
    v6_rows.extend_from_slice(&0u128.to_le_bytes());
    v6_rows.extend_from_slice(&v6_row);
    v6_rows.extend_from_slice(&u128::MAX.to_le_bytes());
    v6_rows.extend_from_slice(&vec![0u8; V6_STRIDE - 16]);
    assert_eq!(v6_rows.len(), v6_rows_bytes);

    let mut file = Vec::new();
    file.push(24); // product type: DB24, every attribute present
    file.push(20); // column count
    file.push(24); // year
    file.push(6); // month
    file.push(1); // day
    file.extend_from_slice(&1u32.to_le_bytes()); // v4 row count
    file.extend_from_slice(&(HEADER_LEN as u32 + 1).to_le_bytes()); // v4 section addr
    file.extend_from_slice(&1u32.to_le_bytes()); // v6 row count
    file.extend_from_slice(&(HEADER_LEN as u32 + v4_rows_bytes as u32 + 1).to_le_bytes()); // v6 section addr
    file.extend_from_slice(&0u32.to_le_bytes()); // v4 index addr
    file.extend_from_slice(&0u32.to_le_bytes()); // v6 index addr
    assert_eq!(file.len(), HEADER_LEN);

    file.extend_from_slice(&v4_rows);
    file.extend_from_slice(&v6_rows);
    assert_eq!(file.len(), heap_start as usize);
    file.extend_from_slice(&heap);

    file
}

#[test]
fn query_v4_returns_full_record() {
    let db = Database::open_with_memory(build_db24()).unwrap();
    let rec = db.query("8.8.8.8", Columns::ALL).unwrap();
    assert_eq!(rec.country_short, "US");
    assert_eq!(rec.country_long, "United States of America");
    assert_eq!(rec.region, "California");
    assert_eq!(rec.city, "Mountain View");
    assert_eq!(rec.isp, "Google LLC");
    assert_eq!(rec.latitude, 37.386);
    assert_eq!(rec.longitude, -122.084);
    assert_eq!(rec.elevation, 32.0);
    assert_eq!(rec.usage_type, "DCH");
}

#[test]
fn query_ipv4_mapped_matches_native_v4() {
    let db = Database::open_with_memory(build_db24()).unwrap();
    let native = db.query("8.8.8.8", Columns::ALL).unwrap();
    let mapped = db.query("::ffff:8.8.8.8", Columns::ALL).unwrap();
    assert_eq!(native, mapped);
}

#[test]
fn query_native_v6_hits_v6_section() {
    let db = Database::open_with_memory(build_db24()).unwrap();
    let rec = db.query("2001:4860:4860::8888", Columns::ALL).unwrap();
    assert_eq!(rec.country_short, "US");
    assert_eq!(rec.city, "Mountain View");
}
