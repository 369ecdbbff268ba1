use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use futures::TryStreamExt;
use mongodb::{options::ReturnDocument, Client, Collection, Database};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{
    clean::normalize,
    error::{AtlasError, Result},
    model::{
        docs::{
            DistrictStatDoc, MappingDoc, OfficeDoc, RegencyMetaDoc, VillageDoc, HAMLET_LIST_KEYS, HAMLET_NAME_KEYS,
            HAMLET_STATUS_KEYS,
        },
        DistributionOffice, DistributionVillageMapping, DistrictStat, Granularity, RegencyMeta, Village,
    },
};
use super::{same_hamlet, AtlasStore, CollectionNames, VillageScope};

/// Field spellings seen for the regency and district columns.
const REGENCY_FIELDS: [&str; 4] = ["kabupaten", "Kabupaten", "KABUPATEN", "kabupaten_kota"];
const DISTRICT_FIELDS: [&str; 3] = ["kecamatan", "Kecamatan", "KECAMATAN"];

/// MongoDB-backed store.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    names: CollectionNames,
}

impl MongoStore {
    /// Connect and verify the server answers a ping.
    pub async fn connect(uri: &str, db_name: &str, names: CollectionNames) -> Result<Self> {
        info!("Connecting to MongoDB database '{}'", db_name);

        let client = Client::with_uri_str(uri).await
            .map_err(|e| AtlasError::Storage(format!("Failed to connect to MongoDB: {}", e)))?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await
            .map_err(|e| AtlasError::Storage(format!("MongoDB ping failed: {}", e)))?;

        Ok(Self { db, names })
    }

    #[inline]
    fn raw(&self, name: &str) -> Collection<Document> { self.db.collection::<Document>(name) }

    /// Read every document matching `filter`, decode it into the boundary
    /// shape `D` and convert to `T`. Undecodable documents are skipped.
    async fn fetch<D, T>(&self, collection: &str, filter: Document) -> Result<Vec<T>>
    where
        D: DeserializeOwned,
        T: From<D>,
    {
        let mut cursor = self.raw(collection).find(filter).await?;
        let (mut items, mut skipped) = (Vec::new(), 0usize);
        while let Some(document) = cursor.try_next().await? {
            match bson::from_document::<D>(document) {
                Ok(decoded) => items.push(T::from(decoded)),
                Err(e) => {
                    skipped += 1;
                    debug!("[store::mongo] skipping document in '{}': {}", collection, e);
                }
            }
        }
        if skipped > 0 {
            warn!("[store::mongo] skipped {} undecodable documents in '{}'", skipped, collection);
        }
        debug!("[store::mongo] fetched {} records from '{}'", items.len(), collection);
        Ok(items)
    }
}

/// Anchored, case-insensitive pattern for an administrative name that
/// tolerates irregular whitespace and any prefix carried in storage.
pub(crate) fn name_pattern(name: &str) -> String {
    let words: Vec<String> = normalize(name).split_whitespace().map(regex::escape).collect();
    format!(r"^\s*(?:KABUPATEN\s+|KAB\.\s*|KOTA\s+)?{}\s*$", words.join(r"\s+"))
}

fn field_filter(fields: &[&str], name: &str) -> Document {
    let pattern = name_pattern(name);
    let alternatives: Vec<Document> = fields.iter()
        .map(|field| {
            let mut alternative = Document::new();
            alternative.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
            alternative
        })
        .collect();
    doc! { "$or": alternatives }
}

fn scope_filter(scope: &VillageScope) -> Document {
    match scope {
        VillageScope::All => doc! {},
        VillageScope::Regency(regency) => field_filter(&REGENCY_FIELDS, regency),
        VillageScope::District(regency, district) => doc! {
            "$and": [field_filter(&REGENCY_FIELDS, regency), field_filter(&DISTRICT_FIELDS, district)]
        },
    }
}

/// Ids written by the importer are object ids; hand-entered ones are strings.
fn id_value(id: &str) -> Bson {
    match ObjectId::parse_str(id.trim()) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(id.trim().to_string()),
    }
}

/// Position of one hamlet inside a stored village document, with the key
/// spellings that document actually uses.
#[derive(Debug, PartialEq)]
struct HamletSlot {
    list_key: &'static str,
    index: usize,
    name_key: &'static str,
    name: String,
    status_keys: Vec<&'static str>,
}

impl HamletSlot {
    /// First hamlet on `village` whose name matches `hamlet`.
    fn locate(village: &Document, hamlet: &str) -> Option<Self> {
        let (list_key, list) = HAMLET_LIST_KEYS.iter()
            .find_map(|&key| village.get_array(key).ok().map(|list| (key, list)))?;
        list.iter().enumerate().find_map(|(index, entry)| {
            let entry = entry.as_document()?;
            let (name_key, name) = HAMLET_NAME_KEYS.iter()
                .find_map(|&key| entry.get_str(key).ok().map(|name| (key, name)))?;
            if !same_hamlet(name, hamlet) { return None }
            let mut status_keys: Vec<&'static str> = HAMLET_STATUS_KEYS.iter()
                .copied()
                .filter(|&key| entry.contains_key(key))
                .collect();
            if status_keys.is_empty() { status_keys.push(HAMLET_STATUS_KEYS[0]) }
            Some(Self { list_key, index, name_key, name: name.to_string(), status_keys })
        })
    }

    /// Matches only while the slot still holds the hamlet that was located.
    fn filter(&self, id: Bson) -> Document {
        let mut filter = doc! { "_id": id };
        filter.insert(format!("{}.{}.{}", self.list_key, self.index, self.name_key), self.name.as_str());
        filter
    }

    /// Writes every status spelling present on the entry, so no duplicate
    /// key is introduced and none is left stale.
    fn update(&self, status: &str) -> Document {
        let mut set = Document::new();
        for key in &self.status_keys {
            set.insert(format!("{}.{}.{}", self.list_key, self.index, key), status);
        }
        doc! { "$set": set }
    }
}

#[async_trait]
impl AtlasStore for MongoStore {
    async fn villages(&self, scope: &VillageScope) -> Result<Vec<Village>> {
        self.fetch::<VillageDoc, Village>(&self.names.villages, scope_filter(scope)).await
    }

    async fn regency_meta(&self) -> Result<Vec<RegencyMeta>> {
        self.fetch::<RegencyMetaDoc, RegencyMeta>(&self.names.regency_meta, doc! {}).await
    }

    async fn district_stats(&self) -> Result<Vec<DistrictStat>> {
        self.fetch::<DistrictStatDoc, DistrictStat>(&self.names.district_stats, doc! {}).await
    }

    async fn offices(&self, granularity: Granularity) -> Result<Vec<DistributionOffice>> {
        self.fetch::<OfficeDoc, DistributionOffice>(self.names.offices(granularity), doc! {}).await
    }

    async fn village_mappings(&self, granularity: Granularity) -> Result<Vec<DistributionVillageMapping>> {
        self.fetch::<MappingDoc, DistributionVillageMapping>(self.names.mappings(granularity), doc! {}).await
    }

    async fn set_hamlet_status(&self, village_id: &str, hamlet: &str, status: &str) -> Result<Option<Village>> {
        let villages = self.raw(&self.names.villages);
        let id = id_value(village_id);

        let Some(current) = villages.find_one(doc! { "_id": id.clone() }).await? else {
            debug!("[store::mongo] no village '{}'", village_id);
            return Ok(None)
        };
        let Some(slot) = HamletSlot::locate(&current, hamlet) else {
            debug!("[store::mongo] no hamlet '{}' on village '{}'", hamlet, village_id);
            return Ok(None)
        };

        let updated = villages
            .find_one_and_update(slot.filter(id), slot.update(status))
            .return_document(ReturnDocument::After)
            .await?;
        let Some(document) = updated else {
            warn!("[store::mongo] hamlet '{}' on village '{}' changed during the override", hamlet, village_id);
            return Ok(None)
        };

        let village = bson::from_document::<VillageDoc>(document)
            .map(Village::from)
            .map_err(|e| AtlasError::Storage(format!("Updated village '{}' could not be decoded: {}", village_id, e)))?;
        info!("[store::mongo] hamlet '{}' on village '{}' set to '{}'", hamlet, village_id, status);
        Ok(Some(village))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_escape_and_tolerate_prefixes() {
        let pattern = name_pattern("  Kab. Aceh   Besar ");
        assert_eq!(pattern, r"^\s*(?:KABUPATEN\s+|KAB\.\s*|KOTA\s+)?ACEH\s+BESAR\s*$");
        let re = regex::RegexBuilder::new(&pattern).case_insensitive(true).build().unwrap();
        assert!(re.is_match("Kabupaten Aceh Besar"));
        assert!(re.is_match("ACEH BESAR "));
        assert!(!re.is_match("Aceh Besar Timur"));
    }

    #[test]
    fn scope_filters() {
        assert_eq!(scope_filter(&VillageScope::All), doc! {});
        let filter = scope_filter(&VillageScope::District("Pidie".into(), "Kota Sigli".into()));
        assert_eq!(filter.get_array("$and").unwrap().len(), 2);
    }

    #[test]
    fn ids_fall_back_to_strings() {
        assert!(matches!(id_value("65a1f0c2e4b0a1b2c3d4e5f6"), Bson::ObjectId(_)));
        assert_eq!(id_value(" v-17 "), Bson::String("v-17".into()));
    }

    #[test]
    fn hamlet_slot_uses_stored_spellings() {
        let village = doc! {
            "_id": "v1",
            "Dusun": [
                { "Nama": "Dusun Timu", "Status": "Belum Berlistrik" },
                { "nama": "Dusun  Barat", "Status": "Belum Berlistrik", "status": "Berlistrik PLN" },
            ],
        };
        let slot = HamletSlot::locate(&village, "dusun barat").unwrap();
        assert_eq!((slot.list_key, slot.index, slot.name_key), ("Dusun", 1, "nama"));
        assert_eq!(slot.status_keys, ["status", "Status"]);
        assert_eq!(slot.filter(Bson::String("v1".into())), doc! { "_id": "v1", "Dusun.1.nama": "Dusun  Barat" });
        assert_eq!(
            slot.update("Berlistrik PLN"),
            doc! { "$set": { "Dusun.1.status": "Berlistrik PLN", "Dusun.1.Status": "Berlistrik PLN" } },
        );

        let first = HamletSlot::locate(&village, "DUSUN TIMU").unwrap();
        assert_eq!((first.index, first.name_key), (0, "Nama"));
        assert_eq!(first.update("Berlistrik PLN"), doc! { "$set": { "Dusun.0.Status": "Berlistrik PLN" } });
    }

    #[test]
    fn overridden_document_keeps_its_hamlets() {
        let mut village = doc! {
            "_id": "v1",
            "dusun": [
                { "nama": "A", "Status": "Belum Berlistrik" },
                { "nama": "B", "Status": "Berlistrik PLN" },
            ],
        };
        let slot = HamletSlot::locate(&village, "a").unwrap();
        // Apply the `$set` paths by hand, as the server would.
        let set = slot.update("Berlistrik PLN").get_document("$set").unwrap().clone();
        let list = village.get_array_mut("dusun").unwrap();
        let entry = list[0].as_document_mut().unwrap();
        for (path, value) in set {
            entry.insert(path.rsplit('.').next().unwrap(), value);
        }

        let decoded = Village::from(bson::from_document::<VillageDoc>(village).unwrap());
        assert_eq!(decoded.hamlets.len(), 2);
        assert_eq!(decoded.hamlets[0].status, "Berlistrik PLN");
    }

    #[test]
    fn hamlet_slot_misses() {
        let village = doc! { "_id": "v1", "dusun": [{ "nama": "A" }, "#REF!"] };
        assert!(HamletSlot::locate(&village, "Z").is_none());
        assert!(HamletSlot::locate(&doc! { "_id": "v2", "dusun": "#N/A" }, "A").is_none());
        assert_eq!(HamletSlot::locate(&village, " a ").unwrap().status_keys, ["status"]);
    }
}
