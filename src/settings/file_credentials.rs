use crate::model::error::{DumpError, DumpResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Storage credentials read from the file passed on the command line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCredential {
    pub name: String,
    pub access_key: String,
    pub secret_key: String,
    pub default_region: String,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

/// Layout of the JSON credentials file (`accessKeyId`, `secretAccessKey`, `region`, ...)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsonCredential {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    session_token: Option<String>,
    endpoint: Option<String>,
    s3_force_path_style: bool,
}

impl FileCredential {
    fn try_parse_file(path: &Path) -> DumpResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DumpError::config(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "default".to_string());

        let credential = if contents.trim_start().starts_with('{') {
            Self::parse_json(&contents, name, path)?
        } else {
            Self::parse_key_values(&contents, name, path)?
        };

        if credential.access_key.is_empty()
            || credential.secret_key.is_empty()
            || credential.default_region.is_empty()
        {
            return Err(DumpError::config(format!(
                "missing access key/secret key/region in file: {}",
                path.display()
            )));
        }
        Ok(credential)
    }

    fn parse_json(contents: &str, name: String, path: &Path) -> DumpResult<Self> {
        let json: JsonCredential = serde_json::from_str(contents).map_err(|e| {
            DumpError::config(format!(
                "malformed credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self {
            name,
            access_key: json.access_key_id,
            secret_key: json.secret_access_key,
            default_region: json.region,
            session_token: json.session_token,
            endpoint_url: json.endpoint,
            force_path_style: json.s3_force_path_style,
        })
    }

    fn parse_key_values(contents: &str, name: String, path: &Path) -> DumpResult<Self> {
        let mut credential = Self {
            name,
            ..Self::default()
        };

        for line in contents.lines() {
            if let Some(stripped) = line.strip_prefix("access_key=") {
                credential.access_key = stripped.trim().to_string()
            } else if let Some(stripped) = line.strip_prefix("secret_key=") {
                credential.secret_key = stripped.trim().to_string()
            } else if let Some(stripped) = line.strip_prefix("default_region=") {
                credential.default_region = stripped.trim().to_string()
            } else if let Some(stripped) = line.strip_prefix("session_token=") {
                credential.session_token = Some(stripped.trim().to_string())
            } else if let Some(stripped) = line.strip_prefix("endpoint_url=") {
                credential.endpoint_url = Some(stripped.trim().to_string())
            } else if let Some(stripped) = line.strip_prefix("force_path_style=") {
                credential.force_path_style = stripped.trim().parse().map_err(|_| {
                    DumpError::config(format!(
                        "configuration param [force_path_style] is not a valid boolean (true/false) in file: {}",
                        path.display()
                    ))
                })?;
            }
        }
        Ok(credential)
    }
}

pub fn load_credentials(path: &Path) -> DumpResult<FileCredential> {
    FileCredential::try_parse_file(path)
}
