//! Storage document shapes, one per source collection.
//!
//! Source collections were filled from spreadsheets by different people, so
//! keys vary in case and naming and every scalar may hold a formula error.
//! These shapes accept all observed spellings and convert into the canonical
//! model immediately after fetch; nothing past this module sees them.

use std::collections::BTreeMap;

use bson::oid::ObjectId;
use serde::{de::IgnoredAny, Deserialize};

use super::{
    loose::{count_of, f64_of, text_of, year_of, Loose},
    meta::{DistributionOffice, DistributionVillageMapping, DistrictStat, RegencyMeta},
    village::{Coordinates, Hamlet, Population, Village},
};
use crate::clean::display;

/// Document identifier as found in storage or in a JSON snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DocId {
    Oid(ObjectId),
    Text(String),
    Num(i64),
}

impl DocId {
    pub fn to_key(&self) -> String {
        match self {
            DocId::Oid(oid) => oid.to_hex(),
            DocId::Text(s) => s.clone(),
            DocId::Num(n) => n.to_string(),
        }
    }
}

/// The two coordinate representations found on source records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoordinates {
    #[serde(default, alias = "Latitude", alias = "LATITUDE")]
    pub latitude: Option<Loose>,
    #[serde(default, alias = "Longitude", alias = "LONGITUDE")]
    pub longitude: Option<Loose>,

    /// Legacy pair written by the first import.
    #[serde(default, alias = "Lat", alias = "LAT")]
    pub lat: Option<Loose>,
    #[serde(default, alias = "Lng", alias = "long", alias = "lon", alias = "LNG")]
    pub lng: Option<Loose>,
    /// Legacy `"lat, lng"` text.
    #[serde(default, alias = "Koordinat", alias = "KOORDINAT")]
    pub koordinat: Option<Loose>,
}

impl RawCoordinates {
    pub fn reconcile(&self) -> Option<Coordinates> {
        let pair = |a: &Option<Loose>, b: &Option<Loose>| Coordinates::new(f64_of(a)?, f64_of(b)?);
        let primary = pair(&self.latitude, &self.longitude);
        let legacy = pair(&self.lat, &self.lng)
            .or_else(|| text_of(&self.koordinat).and_then(|s| Coordinates::parse_pair(&s)));
        Coordinates::reconcile(primary, legacy)
    }
}

/// Keys the hamlet list is stored under on a village document.
pub(crate) const HAMLET_LIST_KEYS: [&str; 3] = ["dusun", "Dusun", "DUSUN"];
/// Keys a hamlet's name is stored under.
pub(crate) const HAMLET_NAME_KEYS: [&str; 4] = ["nama", "Nama", "NAMA", "nama_dusun"];
/// Keys a hamlet's status is stored under.
pub(crate) const HAMLET_STATUS_KEYS: [&str; 4] = ["status", "Status", "STATUS", "status_listrik"];

/// One embedded hamlet. Entries edited by hand may carry the same field
/// under several spellings; the first spelling in key-list order wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "BTreeMap<String, Option<Loose>>")]
pub struct HamletDoc {
    pub nama: Option<Loose>,
    pub status: Option<Loose>,
}

impl From<BTreeMap<String, Option<Loose>>> for HamletDoc {
    fn from(mut fields: BTreeMap<String, Option<Loose>>) -> Self {
        let mut take = |keys: &[&str]| keys.iter().find_map(|key| fields.remove(*key).flatten());
        HamletDoc { nama: take(&HAMLET_NAME_KEYS), status: take(&HAMLET_STATUS_KEYS) }
    }
}

impl From<HamletDoc> for Hamlet {
    fn from(doc: HamletDoc) -> Self {
        Hamlet {
            name: text_of(&doc.nama).unwrap_or_default(),
            status: text_of(&doc.status).unwrap_or_default(),
        }
    }
}

/// The hamlet list field; a broken import sometimes leaves a scalar here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HamletList {
    List(Vec<HamletDoc>),
    Broken(IgnoredAny),
}

impl Default for HamletList {
    fn default() -> Self { HamletList::List(Vec::new()) }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopulationFields {
    #[serde(default, alias = "Jumlah Penduduk", alias = "penduduk", alias = "JUMLAH_PENDUDUK")]
    pub jumlah_penduduk: Option<Loose>,
    #[serde(default, alias = "sumber", alias = "sumber_data", alias = "Sumber")]
    pub sumber_penduduk: Option<Loose>,
    #[serde(default, alias = "tahun", alias = "tahun_data", alias = "Tahun")]
    pub tahun_penduduk: Option<Loose>,
}

impl PopulationFields {
    fn into_population(self) -> Population {
        Population {
            count: f64_of(&self.jumlah_penduduk).filter(|n| *n >= 0.0),
            source: text_of(&self.sumber_penduduk),
            year: year_of(&self.tahun_penduduk),
        }
    }
}

/// Village collection document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VillageDoc {
    #[serde(rename = "_id", default)]
    pub id: Option<DocId>,
    #[serde(default, alias = "Kabupaten", alias = "KABUPATEN", alias = "kabupaten_kota")]
    pub kabupaten: Option<Loose>,
    #[serde(default, alias = "Kecamatan", alias = "KECAMATAN")]
    pub kecamatan: Option<Loose>,
    #[serde(default, alias = "Desa", alias = "DESA", alias = "gampong")]
    pub desa: Option<Loose>,
    #[serde(default, alias = "Dusun", alias = "DUSUN")]
    pub dusun: HamletList,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(flatten)]
    pub population: PopulationFields,
    #[serde(default, alias = "pelanggan", alias = "Jumlah Pelanggan")]
    pub jumlah_pelanggan: Option<Loose>,
}

impl From<VillageDoc> for Village {
    fn from(doc: VillageDoc) -> Self {
        let coordinates = doc.coordinates.reconcile();
        let hamlets = match doc.dusun {
            HamletList::List(list) => list.into_iter().map(Hamlet::from).collect(),
            HamletList::Broken(_) => Vec::new(),
        };
        Village {
            id: doc.id.as_ref().map(DocId::to_key),
            regency: name_of(&doc.kabupaten),
            district: name_of(&doc.kecamatan),
            village: name_of(&doc.desa),
            coordinates,
            hamlets,
            population: doc.population.into_population(),
            customer_count: count_of(&doc.jumlah_pelanggan),
        }
    }
}

/// Regency metadata collection document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegencyMetaDoc {
    #[serde(default, alias = "kabupaten", alias = "Kabupaten", alias = "nama")]
    pub nama_kabupaten: Option<Loose>,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(flatten)]
    pub population: PopulationFields,
}

impl From<RegencyMetaDoc> for RegencyMeta {
    fn from(doc: RegencyMetaDoc) -> Self {
        RegencyMeta {
            regency: name_of(&doc.nama_kabupaten),
            coordinates: doc.coordinates.reconcile(),
            population: doc.population.into_population(),
        }
    }
}

/// District statistics collection document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistrictStatDoc {
    #[serde(default, alias = "Kabupaten", alias = "KABUPATEN")]
    pub kabupaten: Option<Loose>,
    #[serde(default, alias = "Kecamatan", alias = "KECAMATAN")]
    pub kecamatan: Option<Loose>,
    #[serde(flatten)]
    pub population: PopulationFields,
}

impl From<DistrictStatDoc> for DistrictStat {
    fn from(doc: DistrictStatDoc) -> Self {
        DistrictStat {
            regency: name_of(&doc.kabupaten),
            district: name_of(&doc.kecamatan),
            population: doc.population.into_population(),
        }
    }
}

/// Distribution office document (both granularities share the shape).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficeDoc {
    #[serde(default, alias = "nama_up3", alias = "nama_ulp", alias = "up3", alias = "ulp", alias = "nama")]
    pub unit: Option<Loose>,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(default, alias = "pelanggan", alias = "Jumlah Pelanggan")]
    pub jumlah_pelanggan: Option<Loose>,
    #[serde(default, alias = "update_pelanggan", alias = "tanggal", alias = "Per Tanggal")]
    pub per_tanggal: Option<Loose>,
}

impl From<OfficeDoc> for DistributionOffice {
    fn from(doc: OfficeDoc) -> Self {
        DistributionOffice {
            unit: name_of(&doc.unit),
            coordinates: doc.coordinates.reconcile(),
            customer_count: count_of(&doc.jumlah_pelanggan),
            customer_count_as_of: text_of(&doc.per_tanggal),
        }
    }
}

/// Village-to-unit mapping document (both granularities share the shape).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingDoc {
    #[serde(default, alias = "up3", alias = "ulp", alias = "nama_up3", alias = "nama_ulp", alias = "UP3", alias = "ULP")]
    pub unit: Option<Loose>,
    #[serde(default, alias = "Kabupaten", alias = "KABUPATEN")]
    pub kabupaten: Option<Loose>,
    #[serde(default, alias = "Kecamatan", alias = "KECAMATAN")]
    pub kecamatan: Option<Loose>,
    #[serde(default, alias = "Desa", alias = "DESA", alias = "gampong")]
    pub desa: Option<Loose>,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(default, alias = "status_listrik", alias = "listrik", alias = "Berlistrik")]
    pub berlistrik: Option<Loose>,
}

impl From<MappingDoc> for DistributionVillageMapping {
    fn from(doc: MappingDoc) -> Self {
        DistributionVillageMapping {
            unit: text_of(&doc.unit).map(|u| display(&u)).filter(|u| !u.is_empty()),
            regency: name_of(&doc.kabupaten),
            district: name_of(&doc.kecamatan),
            village: name_of(&doc.desa),
            coordinates: doc.coordinates.reconcile(),
            electrified: doc.berlistrik.as_ref().is_some_and(Loose::as_flag),
        }
    }
}

#[inline]
fn name_of(value: &Option<Loose>) -> String { text_of(value).map(|s| display(&s)).unwrap_or_default() }
