// SPDX-License-Identifier: MPL-2.0
//! Address codec: item id <-> navigation address.
//!
//! Addresses are origin-relative (`/item/abc`, `/items?itemId=abc&tab=2`).
//! They are parsed against a placeholder origin so the `url` crate can do
//! the path and query handling, and the origin is sliced off again on output.

use crate::domain::ItemId;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use url::{Position, Url};

const ORIGIN: &str = "http://localhost";

/// Query parameter carrying the item id in [`RouteScheme::Query`].
pub const ITEM_PARAM: &str = "itemId";

const PATH_PREFIX: &str = "item";
const LIST_PATH: &str = "/items";

/// Characters escaped when an id is written as a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// How the open item is written into the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteScheme {
    /// Closed is `/`, open is `/item/{id}`.
    #[default]
    Path,
    /// Closed is `/items`, open is `/items?itemId={id}`.
    Query,
}

impl RouteScheme {
    /// Address shown when nothing is open and there is no history to go by.
    #[must_use]
    pub fn root(self) -> &'static str {
        match self {
            RouteScheme::Path => "/",
            RouteScheme::Query => LIST_PATH,
        }
    }
}

/// Encodes and decodes item ids for one [`RouteScheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressCodec {
    scheme: RouteScheme,
}

impl AddressCodec {
    #[must_use]
    pub fn new(scheme: RouteScheme) -> Self {
        Self { scheme }
    }

    #[must_use]
    pub fn scheme(&self) -> RouteScheme {
        self.scheme
    }

    /// Extracts the item id, if the address encodes one.
    #[must_use]
    pub fn decode(&self, address: &str) -> Option<ItemId> {
        let url = parse(address)?;
        let raw = match self.scheme {
            RouteScheme::Path => {
                let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
                let (prefix, id) = (segments.next()?, segments.next()?);
                if prefix != PATH_PREFIX || segments.next().is_some() {
                    return None;
                }
                percent_decode_str(id).decode_utf8().ok()?.into_owned()
            }
            RouteScheme::Query => {
                if url.path().trim_end_matches('/') != LIST_PATH {
                    return None;
                }
                url.query_pairs()
                    .find(|(key, _)| key == ITEM_PARAM)
                    .map(|(_, value)| value.into_owned())?
            }
        };

        (!raw.is_empty()).then(|| ItemId::new(raw))
    }

    /// Address with `id` open, keeping whatever else `current` carries.
    #[must_use]
    pub fn encode_open(&self, current: &str, id: &ItemId) -> String {
        let Some(mut url) = parse(current).or_else(|| parse(self.scheme.root())) else {
            return self.scheme.root().to_string();
        };

        match self.scheme {
            RouteScheme::Path => {
                let segment = utf8_percent_encode(id.as_str(), SEGMENT).to_string();
                url.set_path(&format!("/{PATH_PREFIX}/{segment}"));
            }
            RouteScheme::Query => {
                url.set_path(LIST_PATH);
                let mut pairs = other_pairs(&url);
                pairs.push((ITEM_PARAM.to_string(), id.as_str().to_string()));
                set_pairs(&mut url, &pairs);
            }
        }
        relative(&url)
    }

    /// Address with nothing open, keeping whatever else `current` carries.
    #[must_use]
    pub fn encode_closed(&self, current: &str) -> String {
        let Some(mut url) = parse(current) else {
            return self.scheme.root().to_string();
        };

        match self.scheme {
            RouteScheme::Path => url.set_path("/"),
            RouteScheme::Query => {
                url.set_path(LIST_PATH);
                let pairs = other_pairs(&url);
                set_pairs(&mut url, &pairs);
            }
        }
        relative(&url)
    }
}

fn parse(address: &str) -> Option<Url> {
    Url::parse(ORIGIN).and_then(|base| base.join(address)).ok()
}

fn relative(url: &Url) -> String {
    url[Position::BeforePath..].to_string()
}

fn other_pairs(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(key, _)| key != ITEM_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn set_pairs(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}
