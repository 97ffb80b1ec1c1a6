//! Context (spec §3): the module pipeline (spec §4.8), schema file search
//! (spec §4.9), and the state every compile pass reads and writes.
//!
//! This crate is the one concrete implementation of every external
//! collaborator trait the core crates define (typedef/identity/feature
//! resolvers, `ModuleLookup`) — everywhere else in the workspace sees those
//! only as `&dyn Trait`.

mod context;
mod module;
mod options;
mod pipeline;
mod resolvers;
mod search;
mod sync;

pub use context::Context;
pub use module::{CompiledModule, LoadedModule};
pub use options::ContextOptions;
pub use search::FoundSchema;
pub use sync::SyncContext;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt;
    use std::fs;
    use yang_diagnostic::ErrorKind;
    use yang_ir::dictionary::SimpleDictionary;
    use yang_ir::pform::{
        AugmentP, ContainerP, DeviateP, DeviatePropsP, DeviationP, FeatureP, LeafP, ModuleP,
        NodeCommonP, NodeP, TypeRefP, YangVersion,
    };
    use yang_ir::xpath::PassthroughXPathCompiler;
    use yang_ir::{ParseBackend, SourceFormat, StringDictionary};
    use yang_node::NodePayload;
    use yang_patterns::PassthroughPatternEngine;

    #[derive(Debug)]
    struct TestParseError(String);

    impl fmt::Display for TestParseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for TestParseError {}

    /// A `ParseBackend` that returns pre-built P-form trees keyed by the raw
    /// bytes handed to `parse` — stands in for a real lexer/parser, which is
    /// external to this workspace (spec §6).
    struct ScriptedParser {
        modules: Vec<(Vec<u8>, ModuleP)>,
    }

    impl ParseBackend for ScriptedParser {
        type Error = TestParseError;

        fn parse(&self, data: &[u8], _format: SourceFormat, _dict: &dyn StringDictionary) -> Result<ModuleP, Self::Error> {
            self.modules
                .iter()
                .find(|(key, _)| key == data)
                .map(|(_, m)| m.clone())
                .ok_or_else(|| TestParseError(format!("no scripted module for {data:?}")))
        }
    }

    fn common(dict: &SimpleDictionary, name: &str) -> NodeCommonP {
        NodeCommonP {
            name: dict.intern(name),
            ..NodeCommonP::default()
        }
    }

    fn string_type(dict: &SimpleDictionary) -> TypeRefP {
        TypeRefP { name: dict.intern("string"), ..TypeRefP::default() }
    }

    fn new_context(parser: ScriptedParser, dict: SimpleDictionary) -> Context<ScriptedParser> {
        Context::new(
            parser,
            Box::new(dict),
            Box::new(PassthroughXPathCompiler),
            Box::new(PassthroughPatternEngine),
            ContextOptions::empty(),
        )
    }

    /// A module `m` with one feature `fancy`, a presence container `top`
    /// holding leaf `name`, and an augment adding leaf `extra` to `top`.
    fn build_module_m(dict: &SimpleDictionary) -> ModuleP {
        let leaf = NodeP::Leaf(LeafP {
            common: common(dict, "name"),
            type_ref: string_type(dict),
            units: None,
            default: None,
            mandatory: false,
        });
        let top = NodeP::Container(ContainerP {
            common: common(dict, "top"),
            presence: Some(dict.intern("")),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            children: vec![leaf],
        });
        let extra = NodeP::Leaf(LeafP {
            common: common(dict, "extra"),
            type_ref: string_type(dict),
            units: None,
            default: None,
            mandatory: false,
        });
        let augment = AugmentP {
            target_path: dict.intern("/top"),
            when: None,
            iffeatures: Vec::new(),
            children: vec![extra],
        };
        ModuleP {
            name: dict.intern("m"),
            namespace: dict.intern("urn:m"),
            prefix: dict.intern("m"),
            belongs_to: None,
            yang_version: YangVersion::V1_1,
            revisions: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            features: vec![FeatureP {
                name: dict.intern("fancy"),
                iffeatures: Vec::new(),
                status: None,
                description: None,
            }],
            identities: Vec::new(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            data: vec![top],
            augments: vec![augment],
            rpcs: Vec::new(),
            notifications: Vec::new(),
            deviations: Vec::new(),
            extensions: Vec::new(),
        }
    }

    #[test]
    fn module_pipeline_parses_and_compiles() {
        let dict = SimpleDictionary::new();
        let module = build_module_m(&dict);
        let parser = ScriptedParser { modules: vec![(b"m".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let id = ctx.parse_mem(b"m", SourceFormat::YangText, true).unwrap();
        ctx.compile(id).unwrap();

        assert_eq!(ctx.module_name(id), "m");
    }

    #[test]
    fn augment_splices_a_child_onto_its_target() {
        let dict = SimpleDictionary::new();
        let module = build_module_m(&dict);
        let parser = ScriptedParser { modules: vec![(b"m".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let id = ctx.parse_mem(b"m", SourceFormat::YangText, true).unwrap();
        ctx.compile(id).unwrap();

        let compiled = ctx.module_compiled(id).unwrap();
        let top = compiled.top.unwrap();
        let top_children = match &compiled.nodes.get(top).payload {
            NodePayload::Container { first_child, .. } => *first_child,
            _ => panic!("expected top to be a container"),
        };
        let extra = compiled
            .nodes
            .find_by_name(top_children, ctx.dict(), "extra")
            .expect("augment should have spliced 'extra' onto 'top'");
        assert!(compiled.nodes.get(extra).flags.contains(yang_ir::NodeFlags::AUGMENTED));
    }

    #[test]
    fn feature_enable_disable_round_trips() {
        let dict = SimpleDictionary::new();
        let module = build_module_m(&dict);
        let parser = ScriptedParser { modules: vec![(b"m".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let id = ctx.parse_mem(b"m", SourceFormat::YangText, true).unwrap();
        ctx.compile(id).unwrap();

        assert!(!ctx.feature_value(id, "fancy").unwrap());
        ctx.feature_enable(id, "fancy").unwrap();
        assert!(ctx.feature_value(id, "fancy").unwrap());
        ctx.feature_disable(id, "fancy").unwrap();
        assert!(!ctx.feature_value(id, "fancy").unwrap());
    }

    #[test]
    fn unknown_feature_name_is_a_reference_error() {
        let dict = SimpleDictionary::new();
        let module = build_module_m(&dict);
        let parser = ScriptedParser { modules: vec![(b"m".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let id = ctx.parse_mem(b"m", SourceFormat::YangText, true).unwrap();
        ctx.compile(id).unwrap();

        let err = ctx.feature_value(id, "no-such-feature").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
    }

    #[test]
    fn recompiling_an_already_compiled_module_is_a_no_op() {
        let dict = SimpleDictionary::new();
        let module = build_module_m(&dict);
        let parser = ScriptedParser { modules: vec![(b"m".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let id = ctx.parse_mem(b"m", SourceFormat::YangText, true).unwrap();
        ctx.compile(id).unwrap();
        ctx.compile(id).unwrap();
    }

    /// Module `dev` deviates its own leaf to become mandatory — exercised
    /// through the full pipeline as a same-module deviation (SPEC_FULL §C).
    fn build_module_dev(dict: &SimpleDictionary) -> ModuleP {
        let leaf = NodeP::Leaf(LeafP {
            common: common(dict, "setting"),
            type_ref: string_type(dict),
            units: None,
            default: None,
            mandatory: false,
        });
        let top = NodeP::Container(ContainerP {
            common: common(dict, "top"),
            presence: None,
            typedefs: Vec::new(),
            groupings: Vec::new(),
            children: vec![leaf],
        });
        let deviation = DeviationP {
            target_path: dict.intern("/top/setting"),
            description: None,
            deviates: vec![DeviateP::Add(DeviatePropsP {
                mandatory: Some(true),
                ..DeviatePropsP::default()
            })],
        };
        ModuleP {
            name: dict.intern("dev"),
            namespace: dict.intern("urn:dev"),
            prefix: dict.intern("dev"),
            belongs_to: None,
            yang_version: YangVersion::V1_1,
            revisions: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            features: Vec::new(),
            identities: Vec::new(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            data: vec![top],
            augments: Vec::new(),
            rpcs: Vec::new(),
            notifications: Vec::new(),
            deviations: vec![deviation],
            extensions: Vec::new(),
        }
    }

    #[test]
    fn deviation_applies_through_the_full_pipeline() {
        let dict = SimpleDictionary::new();
        let module = build_module_dev(&dict);
        let parser = ScriptedParser { modules: vec![(b"dev".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let id = ctx.parse_mem(b"dev", SourceFormat::YangText, true).unwrap();
        ctx.compile(id).unwrap();
    }

    #[test]
    fn schema_file_search_locates_a_scripted_module_on_disk() {
        let dict = SimpleDictionary::new();
        let module = build_module_m(&dict);
        let parser = ScriptedParser { modules: vec![(b"file contents".to_vec(), module)] };
        let mut ctx = new_context(parser, dict);

        let dir = std::env::temp_dir().join(format!("yang_context_lib_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("m.yang"), b"file contents").unwrap();
        ctx.add_search_path(dir.clone());

        let found = ctx.search_localfile("m", None).unwrap();
        assert_eq!(found.path.file_name().unwrap().to_str().unwrap(), "m.yang");

        let id = ctx.parse_path(&found.path, true).unwrap();
        ctx.compile(id).unwrap();
        assert_eq!(ctx.module_name(id), "m");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn circular_import_is_rejected() {
        let dict = SimpleDictionary::new();
        let a = ModuleP {
            name: dict.intern("a"),
            namespace: dict.intern("urn:a"),
            prefix: dict.intern("a"),
            belongs_to: None,
            yang_version: YangVersion::V1_1,
            revisions: Vec::new(),
            imports: vec![yang_ir::pform::ImportP { module: dict.intern("b"), prefix: dict.intern("b"), revision: None }],
            includes: Vec::new(),
            features: Vec::new(),
            identities: Vec::new(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            data: Vec::new(),
            augments: Vec::new(),
            rpcs: Vec::new(),
            notifications: Vec::new(),
            deviations: Vec::new(),
            extensions: Vec::new(),
        };
        let mut b = a.clone();
        b.name = dict.intern("b");
        b.namespace = dict.intern("urn:b");
        b.prefix = dict.intern("b");
        b.imports = vec![yang_ir::pform::ImportP { module: dict.intern("a"), prefix: dict.intern("a"), revision: None }];

        let parser = ScriptedParser { modules: vec![(b"a".to_vec(), a), (b"b".to_vec(), b)] };
        let mut ctx = new_context(parser, dict);

        let dir = std::env::temp_dir().join(format!("yang_context_circular_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.yang"), b"a").unwrap();
        fs::write(dir.join("b.yang"), b"b").unwrap();
        ctx.add_search_path(dir.clone());

        let id = ctx.parse_mem(b"a", SourceFormat::YangText, true).unwrap();
        let err = ctx.compile(id).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        fs::remove_dir_all(&dir).ok();
    }
}
