// ABOUTME: Phantom-typed identifiers for AWS resources touched during a replace.
// ABOUTME: Instance IDs, member and task ARNs, pool and cluster names cannot be swapped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// The kind of resource an [`Id`] names.
pub trait ResourceKind {
    /// Name shown in debug output.
    const LABEL: &'static str;
}

macro_rules! resource_kind {
    ($($marker:ident => $label:literal),* $(,)?) => {
        $(
            pub enum $marker {}

            impl ResourceKind for $marker {
                const LABEL: &'static str = $label;
            }
        )*
    };
}

resource_kind! {
    InstanceMarker => "InstanceId",
    MemberMarker => "MemberArn",
    TaskMarker => "TaskArn",
    PoolMarker => "PoolName",
    ClusterMarker => "ClusterName",
}

/// An identifier as the control plane reports it, tagged with its resource kind.
///
/// Passing a `PoolName` where a `MemberArn` is expected fails to compile.
/// Comparison, hashing and serialization only look at the string.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<K> {
    value: String,
    kind: PhantomData<fn() -> K>,
}

impl<K> Id<K> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

impl<K: ResourceKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(K::LABEL).field(&self.value).finish()
    }
}

impl<K> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<K> Clone for Id<K> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<K> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Id<K> {}

impl<K> PartialOrd for Id<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Id<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K> AsRef<str> for Id<K> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<K> Serialize for Id<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, K> Deserialize<'de> for Id<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// EC2 instance identifier (`i-0abc...`).
pub type InstanceId = Id<InstanceMarker>;
/// Container instance ARN of a cluster member.
pub type MemberArn = Id<MemberMarker>;
pub type TaskArn = Id<TaskMarker>;
/// Auto scaling group name.
pub type PoolName = Id<PoolMarker>;
pub type ClusterName = Id<ClusterMarker>;
