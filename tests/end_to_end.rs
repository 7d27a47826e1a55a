//! Full `update` -> `query` cycles against an in-memory fake collaborator,
//! covering the concrete scenarios worked through by hand in design review.

use elixir_xref::collaborator::{DefHit, DocHit, FakeCollaborator};
use elixir_xref::config::IndexingConfig;
use elixir_xref::query;
use elixir_xref::store::LmdbStore;
use elixir_xref::types::{DefType, Family, FamilySelector, SymbolInstance};
use elixir_xref::updater;

fn open_temp() -> (tempfile::TempDir, LmdbStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
    (dir, store)
}

fn config() -> IndexingConfig {
    IndexingConfig { workers: 2, blob_timeout_secs: 5, dts_comp_override: None }
}

#[test]
fn single_file_c_define_round_trips_through_ident() {
    let (_dir, store) = open_temp();
    let collaborator = FakeCollaborator::new();
    collaborator.add_tag("v1", &[("h1", "a.c")]);
    collaborator.set_blob_content("h1", b"#define FOO 42\nint bar(void){return FOO;}\n".to_vec());
    collaborator.set_defs("h1", vec![DefHit { ident: "FOO".into(), def_type: DefType::Define, line: 1 }]);

    updater::update(&store, &collaborator, "v1", &config()).unwrap();

    let result = query::ident(&store, "v1", "FOO", FamilySelector::One(Family::C)).unwrap();
    assert_eq!(result.definitions, vec![SymbolInstance::new("define", "a.c", "1")]);
    assert_eq!(result.references, vec![SymbolInstance::new("reference", "a.c", "2")]);
    assert!(result.doccomments.is_empty());
}

#[test]
fn unchanged_content_at_a_new_path_reuses_the_blob_id() {
    let (_dir, store) = open_temp();
    let collaborator = FakeCollaborator::new();
    collaborator.add_tag("v1", &[("h1", "a.c")]);
    collaborator.set_blob_content("h1", b"int x;\n".to_vec());
    updater::update(&store, &collaborator, "v1", &config()).unwrap();

    collaborator.add_tag("v2", &[("h1", "b.c")]);
    updater::update(&store, &collaborator, "v2", &config()).unwrap();

    assert_eq!(updater::enumerate::read_num_blobs(&store).unwrap(), 1);
}

#[test]
fn kconfig_and_makefile_refs_get_the_config_prefix() {
    let (_dir, store) = open_temp();
    let collaborator = FakeCollaborator::new();
    collaborator.add_tag("v1", &[("k1", "arch/x86/Kconfig"), ("m1", "drivers/Makefile")]);
    collaborator.set_blob_content("k1", b"config HAS_FOO\n\tbool\n\tdefault y\n".to_vec());
    collaborator.set_defs("k1", vec![DefHit { ident: "HAS_FOO".into(), def_type: DefType::Config, line: 1 }]);
    collaborator.set_blob_content("m1", b"obj-$(CONFIG_HAS_FOO) += foo.o\n".to_vec());

    updater::update(&store, &collaborator, "v1", &config()).unwrap();

    let defined = query::ident(&store, "v1", "HAS_FOO", FamilySelector::All).unwrap();
    assert_eq!(defined.definitions.len(), 1);

    let referenced = query::ident(&store, "v1", "CONFIG_HAS_FOO", FamilySelector::All).unwrap();
    assert_eq!(referenced.references.len(), 1);
    assert_eq!(referenced.references[0].path, "drivers/Makefile");
}

#[test]
fn a_definition_site_is_never_also_a_reference() {
    let (_dir, store) = open_temp();
    let collaborator = FakeCollaborator::new();
    collaborator.add_tag("v1", &[("c1", "c.c")]);
    collaborator.set_blob_content("c1", b"int x = 0;\nvoid f(void){x=1;}\n".to_vec());
    collaborator.set_defs("c1", vec![DefHit { ident: "x".into(), def_type: DefType::Variable, line: 1 }]);

    updater::update(&store, &collaborator, "v1", &config()).unwrap();

    let result = query::ident(&store, "v1", "x", FamilySelector::All).unwrap();
    assert_eq!(result.definitions, vec![SymbolInstance::new("variable", "c.c", "1")]);
    assert_eq!(result.references, vec![SymbolInstance::new("reference", "c.c", "2")]);
}

#[test]
fn doccomments_join_through_the_manifest_like_definitions() {
    let (_dir, store) = open_temp();
    let collaborator = FakeCollaborator::new();
    collaborator.add_tag("v1", &[("h1", "a.c")]);
    collaborator.set_blob_content("h1", b"/** FOO does a thing */\nint foo(void);\n".to_vec());
    collaborator.set_docs("h1", vec![DocHit { ident: "FOO".into(), line: 1 }]);

    updater::update(&store, &collaborator, "v1", &config()).unwrap();

    let result = query::ident(&store, "v1", "FOO", FamilySelector::All).unwrap();
    assert_eq!(result.doccomments, vec![SymbolInstance::new("doccomment", "a.c", "1")]);
}

#[test]
fn re_running_update_after_it_already_committed_changes_nothing_observable() {
    let (_dir, store) = open_temp();
    let collaborator = FakeCollaborator::new();
    collaborator.add_tag("v1", &[("h1", "a.c")]);
    collaborator.set_blob_content("h1", b"int foo(void) {}\n".to_vec());
    collaborator.set_defs("h1", vec![DefHit { ident: "foo".into(), def_type: DefType::Function, line: 1 }]);

    updater::update(&store, &collaborator, "v1", &config()).unwrap();
    let before = query::ident(&store, "v1", "foo", FamilySelector::All).unwrap();

    updater::update(&store, &collaborator, "v1", &config()).unwrap();
    let after = query::ident(&store, "v1", "foo", FamilySelector::All).unwrap();

    assert_eq!(before, after);
}
