use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// The subset of `npm view --json` output that gets reported.
#[derive(Clone, Debug, Deserialize)]
pub struct PackageDetails {
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<PublishTimes>,
    #[serde(flatten)]
    pub credits: PackageCredits,
}

impl PackageDetails {
    pub fn created_at(&self) -> Option<&str> {
        self.time.as_ref()?.created.as_deref()
    }

    pub fn last_modified_at(&self) -> Option<&str> {
        self.time.as_ref()?.modified.as_deref()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PublishTimes {
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
}

/// Author and license fields, each optional and independently malformed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PackageCredits {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Person>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub contributors: Vec<Person>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub maintainers: Vec<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub license: Option<License>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub licenses: Vec<License>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Text(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Person::Text(text) => f.write_str(text),
            Person::Detailed { name, email, url } => {
                let mut parts = Vec::new();
                if let Some(name) = name {
                    parts.push(name.clone());
                }
                if let Some(email) = email {
                    parts.push(format!("<{email}>"));
                }
                if let Some(url) = url {
                    parts.push(format!("({url})"));
                }
                f.write_str(&parts.join(" "))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum License {
    Text(String),
    Detailed {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl License {
    pub fn kind(&self) -> Option<&str> {
        match self {
            License::Text(text) => Some(text),
            License::Detailed { kind, .. } => kind.as_deref(),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Accepts a list, a single item, or garbage (which becomes empty).
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Value::Null => Vec::new(),
        single => serde_json::from_value(single).into_iter().collect(),
    };
    Ok(items)
}
