//! Identity linker (spec §4.6): compiles each identity's own properties,
//! then resolves `base` derivation across the loaded modules.

mod identity;
mod linker;

pub use identity::{Identity, IdentityUniverse};
pub use linker::{check_no_cycles, compile_properties, link_bases, IdentityBaseResolver};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashMap;
    use yang_diagnostic::ErrorKind;
    use yang_ir::dictionary::SimpleDictionary;
    use yang_ir::pform::{IdentityP, YangVersion};
    use yang_ir::{pform::IdentityRefP, IdentityId, IdentityRef, ModuleId, SchemaPath, StringDictionary, StringId};

    struct NoFeatures;
    impl yang_features::FeatureNameResolver for NoFeatures {
        fn resolve(&self, _prefix: Option<&str>, _name: &str) -> Option<yang_features::FeatureRef> {
            None
        }
    }

    #[derive(Default)]
    struct TestUniverse {
        identities: FxHashMap<IdentityRef, Identity>,
    }

    impl IdentityUniverse for TestUniverse {
        fn identity(&self, r: IdentityRef) -> &Identity {
            &self.identities[&r]
        }

        fn identity_mut(&mut self, r: IdentityRef) -> &mut Identity {
            self.identities.get_mut(&r).expect("identity must be inserted before linking")
        }
    }

    struct ByName<'a> {
        dict: &'a SimpleDictionary,
        module: ModuleId,
        ids: &'a [(StringId, IdentityId)],
    }

    impl IdentityBaseResolver for ByName<'_> {
        fn resolve(&self, _prefix: Option<StringId>, name: StringId) -> yang_diagnostic::Result<IdentityRef> {
            let text = self.dict.resolve(name);
            self.ids
                .iter()
                .find(|(n, _)| self.dict.resolve(*n) == text)
                .map(|&(_, id)| IdentityRef(self.module, id))
                .ok_or_else(|| yang_diagnostic::Error::reference(SchemaPath::root("m"), "no such identity"))
        }
    }

    fn path() -> SchemaPath {
        SchemaPath::root("m")
    }

    #[test]
    fn base_derivation_links_derived_back_to_base() {
        let dict = SimpleDictionary::new();
        let module = ModuleId::new(0);
        let iface = IdentityP {
            name: dict.intern("interface-type"),
            bases: Vec::new(),
            iffeatures: Vec::new(),
            status: None,
            description: None,
        };
        let ethernet = IdentityP {
            name: dict.intern("ethernet"),
            bases: vec![IdentityRefP {
                prefix: None,
                name: dict.intern("interface-type"),
            }],
            iffeatures: Vec::new(),
            status: None,
            description: None,
        };
        let parsed = vec![iface, ethernet];
        let features = NoFeatures;
        let compiled =
            compile_properties(&parsed, &dict, &features, YangVersion::V1_1, &path()).unwrap();

        let mut universe = TestUniverse::default();
        let ids = [IdentityId::new(0), IdentityId::new(1)];
        for (id, identity) in ids.iter().zip(compiled) {
            universe.identities.insert(IdentityRef(module, *id), identity);
        }
        let name_table: Vec<_> = parsed.iter().zip(ids).map(|(p, id)| (p.name, id)).collect();
        let resolver = ByName { dict: &dict, module, ids: &name_table };
        link_bases(module, &parsed, &ids, &mut universe, &resolver, &path()).unwrap();

        let iface_ref = IdentityRef(module, ids[0]);
        let ethernet_ref = IdentityRef(module, ids[1]);
        assert_eq!(universe.identity(ethernet_ref).bases, vec![iface_ref]);
        assert_eq!(universe.identity(iface_ref).derived, vec![ethernet_ref]);
    }

    #[test]
    fn unresolved_base_is_a_reference_error() {
        let dict = SimpleDictionary::new();
        let module = ModuleId::new(0);
        let orphan = IdentityP {
            name: dict.intern("orphan"),
            bases: vec![IdentityRefP {
                prefix: None,
                name: dict.intern("missing-base"),
            }],
            iffeatures: Vec::new(),
            status: None,
            description: None,
        };
        let parsed = vec![orphan];
        let features = NoFeatures;
        let compiled =
            compile_properties(&parsed, &dict, &features, YangVersion::V1_1, &path()).unwrap();

        let mut universe = TestUniverse::default();
        let ids = [IdentityId::new(0)];
        universe.identities.insert(IdentityRef(module, ids[0]), compiled.into_iter().next().unwrap());

        let resolver = ByName { dict: &dict, module, ids: &[] };
        let err = link_bases(module, &parsed, &ids, &mut universe, &resolver, &path()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
    }

    #[test]
    fn self_derivation_is_rejected_as_a_cycle() {
        let dict = SimpleDictionary::new();
        let module = ModuleId::new(0);
        let looped = IdentityP {
            name: dict.intern("looped"),
            bases: vec![IdentityRefP {
                prefix: None,
                name: dict.intern("looped"),
            }],
            iffeatures: Vec::new(),
            status: None,
            description: None,
        };
        let parsed = vec![looped];
        let features = NoFeatures;
        let compiled =
            compile_properties(&parsed, &dict, &features, YangVersion::V1_1, &path()).unwrap();

        let mut universe = TestUniverse::default();
        let ids = [IdentityId::new(0)];
        let own_ref = IdentityRef(module, ids[0]);
        universe.identities.insert(own_ref, compiled.into_iter().next().unwrap());

        let name_table = [(parsed[0].name, ids[0])];
        let resolver = ByName { dict: &dict, module, ids: &name_table };
        link_bases(module, &parsed, &ids, &mut universe, &resolver, &path()).unwrap();

        let err = check_no_cycles(&[own_ref], &universe, &path()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn acyclic_multi_base_dag_passes() {
        let dict = SimpleDictionary::new();
        let module = ModuleId::new(0);
        let names = ["a", "b", "c"];
        let parsed: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, &n)| IdentityP {
                name: dict.intern(n),
                bases: if i == 2 {
                    vec![
                        IdentityRefP { prefix: None, name: dict.intern("a") },
                        IdentityRefP { prefix: None, name: dict.intern("b") },
                    ]
                } else {
                    Vec::new()
                },
                iffeatures: Vec::new(),
                status: None,
                description: None,
            })
            .collect();
        let features = NoFeatures;
        let compiled =
            compile_properties(&parsed, &dict, &features, YangVersion::V1_1, &path()).unwrap();

        let mut universe = TestUniverse::default();
        let ids: Vec<_> = (0..parsed.len()).map(|i| IdentityId::new(i as u32)).collect();
        for (&id, identity) in ids.iter().zip(compiled) {
            universe.identities.insert(IdentityRef(module, id), identity);
        }
        let name_table: Vec<_> = parsed.iter().zip(ids.iter().copied()).map(|(p, id)| (p.name, id)).collect();
        let resolver = ByName { dict: &dict, module, ids: &name_table };
        link_bases(module, &parsed, &ids, &mut universe, &resolver, &path()).unwrap();

        let all: Vec<_> = ids.iter().map(|&id| IdentityRef(module, id)).collect();
        check_no_cycles(&all, &universe, &path()).unwrap();
        assert_eq!(universe.identity(all[0]).derived, vec![all[2]]);
        assert_eq!(universe.identity(all[1]).derived, vec![all[2]]);
    }
}
