use crate::employee::Employee;
use crate::error::{CsmsError, Result};
use crate::paths;
use crate::store::{self, Record};
use crate::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const MIN_NAME_LEN: usize = 3;

/// Standard ministries and agencies loaded by `csms init`.
const DEFAULT_INSTITUTIONS: &[&str] = &[
    "Ofisi ya Msajili wa Hazina",
    "Ofisi ya Mkuu wa Mkoa wa Kusini Unguja",
    "Wakala wa Vipimo Zanzibar",
    "WIZARA YA MAENDELEO YA JAMII,JINSIA,WAZEE NA WATOTO",
    "KAMISHENI YA UTUMISHI WA UMMA",
    "WAKALA WA SERIKALI MTANDAO (eGAZ)",
    "OFISI YA MKAGUZI MKUU WA NDANI WA SERIKALI",
    "Kamisheni ya Ardhi Zanzibar",
    "Ofisi ya Mhasibu Mkuu wa Serikali",
    "TAASISI YA NYARAKA NA KUMBUKUMBU",
    "AFISI YA RAISI KAZI, UCHUMI NA UWEKEZAJI",
    "KAMISHENI YA UTALII ZANZIBAR",
    "SEKRETARIETI YA AJIRA .",
    "TAASISI YA ELIMU YA ZANZIBAR",
    "KAMISHENI YA KUKABILIANA NA MAAFA ZANZIBAR",
    "WAKALA WA MAJENGO ZANZIBAR",
    "OFISI YA RAIS, FEDHA NA MIPANGO",
    "WIZARA YA KILIMO UMWAGILIAJI MALIASILI NA MIFUGO",
    "WIZARA YA UJENZI MAWASILIANO NA UCHUKUZI",
    "OFISI YA MAKAMO WA KWANZA WA RAISI",
    "WIZARA YA BIASHARA NA MAENDELEO YA VIWANDA",
    "SEKRETARIETI YA AJIRA",
    "OFISI YA RAIS, TAWALA ZA MIKOA, SERIKALI ZA MITAA NA IDARA MAALUMU ZA SMZ",
    "OFISI YA RAIS - KATIBA SHERIA UTUMISHI NA UTAWALA BORA",
    "WIZARA YA HABARI, VIJANA, UTAMADUNI NA MICHEZO",
    "TUME YA UCHAGUZI YA ZANZIBAR",
    "OFISI YA MAKAMO WA PILI WA RAISI",
    "WIZARA YA UCHUMI WA BULUU NA UVUVI",
    "OFISI YA MUFTI MKUU WA ZANZIBAR",
    "MAMLAKA YA KUZUIA RUSHWA NA UHUJUMU WA UCHUMI ZANZIBAR",
    "WIZARA YA ARDHI NA MAENDELEO YA MAKAAZI ZANZIBAR",
    "WIZARA YA UTALII NA MAMBO YA KALE",
    "OFISI YA RAIS - IKULU",
    "MAMLAKA YA KUDHIBITI NA KUPAMBANA NA DAWA ZA KULEVYA ZANZIBAR",
    "TUME YA MAADILI YA VIONGOZI WA UMMA",
    "TUME YA UTUMISHI SERIKALINI",
    "AFISI YA MKURUGENZI WA MASHTAKA",
    "AFISI YA MWANASHERIA MKUU",
    "WIZARA YA MAJI NISHATI NA MADINI",
    "WIZARA YA ELIMU NA MAFUNZO YA AMALI",
    "WIZARA YA AFYA",
];

// ---------------------------------------------------------------------------
// Institution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Institution {
    const DIR: &'static str = paths::INSTITUTIONS_DIR;

    fn id(&self) -> &str {
        &self.id
    }

    fn not_found(id: &str) -> CsmsError {
        CsmsError::InstitutionNotFound(id.to_string())
    }
}

impl Institution {
    pub fn create(root: &Path, name: &str) -> Result<Self> {
        let name = Self::check_name(root, name, None)?;
        let now = Utc::now();
        let inst = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            created_at: now,
            updated_at: now,
        };
        store::save(root, &inst)?;
        info!(id = %inst.id, name = %inst.name, "institution created");
        Ok(inst)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::load(root, id)
    }

    /// All institutions sorted by name.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list(root)?;
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    pub fn rename(root: &Path, id: &str, name: &str) -> Result<Self> {
        let mut inst = Self::load(root, id)?;
        inst.name = Self::check_name(root, name, Some(id))?;
        inst.updated_at = Utc::now();
        store::save(root, &inst)?;
        info!(id = %inst.id, name = %inst.name, "institution renamed");
        Ok(inst)
    }

    /// Refused while any user or employee still belongs to the institution.
    pub fn delete(root: &Path, id: &str) -> Result<()> {
        let inst = Self::load(root, id)?;
        let in_use = User::list(root)?.iter().any(|u| u.institution_id == id)
            || store::list::<Employee>(root)?
                .iter()
                .any(|e| e.institution_id == id);
        if in_use {
            return Err(CsmsError::InstitutionInUse(inst.name));
        }
        store::remove::<Self>(root, id)?;
        info!(id, "institution deleted");
        Ok(())
    }

    /// Insert any standard institution whose name is not present yet.
    /// Returns the number created.
    pub fn seed_default(root: &Path) -> Result<usize> {
        let existing = Self::list(root)?;
        let mut created = 0;
        for (i, name) in DEFAULT_INSTITUTIONS.iter().enumerate() {
            if existing.iter().any(|e| e.name.eq_ignore_ascii_case(name)) {
                continue;
            }
            let id = format!("inst_{}", i + 1);
            if store::exists::<Self>(root, &id) {
                continue;
            }
            let now = Utc::now();
            store::save(
                root,
                &Self {
                    id,
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            )?;
            created += 1;
        }
        if created > 0 {
            info!(created, "seeded default institutions");
        }
        Ok(created)
    }

    /// Trimmed name, at least three characters, unique ignoring case.
    fn check_name(root: &Path, name: &str, except_id: Option<&str>) -> Result<String> {
        let name = name.trim();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(CsmsError::validation(format!(
                "institution name must be at least {MIN_NAME_LEN} characters"
            )));
        }
        let taken = Self::list(root)?
            .into_iter()
            .any(|i| Some(i.id.as_str()) != except_id && i.name.to_lowercase() == name.to_lowercase());
        if taken {
            return Err(CsmsError::InstitutionExists(name.to_string()));
        }
        Ok(name.to_string())
    }
}
