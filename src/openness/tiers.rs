use std::collections::HashSet;

/// License identifiers treated as open when no config overrides them.
pub const OPEN_LICENSES: &[&str] = &[
    "cc-by",
    "cc-by-sa",
    "cc-zero",
    "cc0",
    "gfdl",
    "odc-by",
    "odc-odbl",
    "odc-pddl",
    "other-at",
    "other-open",
    "other-pd",
    "psi",
    "uk-ogl",
];

/// Linked data.
pub const FIVE_STAR_FORMATS: &[&str] = &["rdf", "n3", "sparql", "ttl"];

/// Reserved rung of the scale; nothing qualifies by default.
pub const FOUR_STAR_FORMATS: &[&str] = &[];

/// Machine-readable data in an open format.
pub const THREE_STAR_FORMATS: &[&str] = &[
    "kml",
    "wcs",
    "netcdf",
    "tsv",
    "wfs",
    "kmz",
    "qgis",
    "ods",
    "json",
    "odb",
    "odf",
    "odg",
    "xml",
    "wms",
    "wmts",
    "svg",
    "jpeg",
    "csv",
    "atom feed",
    "xyz",
    "png",
    "rss",
    "geojson",
    "iati",
    "ics",
];

/// Machine-readable data in a proprietary format.
pub const TWO_STAR_FORMATS: &[&str] = &[
    "shp",
    "xls",
    "mdb",
    "arcgis map service",
    "bmp",
    "tiff",
    "xlsx",
    "gif",
    "e00",
    "mrsid",
    "arcgis map preview",
    "mop",
    "esri rest",
    "dbase",
];

/// Build a lowercase lookup set from a static table.
pub fn to_set(table: &[&str]) -> HashSet<String> {
    table.iter().map(|s| s.to_lowercase()).collect()
}
