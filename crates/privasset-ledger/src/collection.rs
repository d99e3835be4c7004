//! Private collection definitions and membership.

use std::collections::{BTreeMap, BTreeSet};

use privasset_types::{CollectionName, NetworkConfig, OrgId, PrivassetError, Result};

/// Which organizations' peers hold each private collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    members: BTreeMap<CollectionName, BTreeSet<OrgId>>,
}

impl CollectionRegistry {
    /// One single-member collection per configured organization.
    #[must_use]
    pub fn from_config(config: &NetworkConfig) -> Self {
        let members = config
            .organizations
            .iter()
            .map(|org| {
                (
                    org.private_collection.clone(),
                    BTreeSet::from([org.msp_id.clone()]),
                )
            })
            .collect();
        Self { members }
    }

    /// Fails with `UnknownCollection` if the collection is not defined.
    pub fn ensure_defined(&self, collection: &CollectionName) -> Result<()> {
        if self.members.contains_key(collection) {
            Ok(())
        } else {
            Err(PrivassetError::UnknownCollection(collection.clone()))
        }
    }

    /// Does a peer of `org` hold the data of `collection`?
    #[must_use]
    pub fn is_member(&self, collection: &CollectionName, org: &OrgId) -> bool {
        self.members
            .get(collection)
            .is_some_and(|orgs| orgs.contains(org))
    }

    /// Defined collection names, ascending.
    pub fn names(&self) -> impl Iterator<Item = &CollectionName> {
        self.members.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_follows_config() {
        let reg = CollectionRegistry::from_config(&NetworkConfig::two_orgs());
        let org1 = OrgId::new("Org1MSP");
        let org2 = OrgId::new("Org2MSP");
        let c1 = org1.default_private_collection();
        assert!(reg.is_member(&c1, &org1));
        assert!(!reg.is_member(&c1, &org2));
        assert_eq!(reg.names().count(), 2);
    }

    #[test]
    fn undefined_collection_rejected() {
        let reg = CollectionRegistry::from_config(&NetworkConfig::two_orgs());
        let err = reg.ensure_defined(&CollectionName::new("nope")).unwrap_err();
        assert!(matches!(err, PrivassetError::UnknownCollection(_)));
    }
}
