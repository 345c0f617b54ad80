// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `#[serde(with = "...")]` adapter encoding `BigInt` as a decimal string.

use num_bigint::BigInt;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.trim()
        .parse::<BigInt>()
        .map_err(|e| D::Error::custom(format!("invalid decimal integer {text:?}: {e}")))
}
