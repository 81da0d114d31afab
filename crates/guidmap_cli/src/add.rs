//! `guidmap hash` and `guidmap add`.

use guidmap_cache::CacheStore;
use guidmap_config::GuidmapConfig;

use crate::session::{cache_path, open_store};
use crate::{AddArgs, GlobalArgs, HashArgs};

/// Runs the `guidmap hash` command. Never touches the cache file.
pub fn run_hash(args: &HashArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let store = CacheStore::new();
    for name in &args.names {
        println!("{}  {name}", store.guid_of(name));
    }
    Ok(0)
}

/// Runs the `guidmap add` command.
///
/// Loads the cache, records every name (with the optional container file),
/// and saves it back.
pub fn run(
    args: &AddArgs,
    global: &GlobalArgs,
    config: &GuidmapConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    let store = open_store(&path, config.cache.create_missing)?;

    for name in &args.names {
        let guid = match &args.file_name {
            Some(file_name) => store.add_with_file(name, file_name),
            None => store.add(name),
        };
        if !global.quiet {
            println!("{guid}  {name}");
        }
    }

    store.save_to_file(&path)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::globals;

    #[test]
    fn add_persists_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let args = AddArgs {
            names: vec!["materials/foo.rpak".into(), "models/bar.rmdl".into()],
            file_name: None,
        };
        let code = run(&args, &globals(&path), &GuidmapConfig::default()).unwrap();
        assert_eq!(code, 0);

        let store = CacheStore::new();
        assert_eq!(store.load_from_file(&path).unwrap(), 2);
        let guid = store.guid_of("models/bar.rmdl");
        assert_eq!(
            store.lookup_guid(guid).unwrap().original_string,
            "models/bar.rmdl"
        );
    }

    #[test]
    fn add_with_file_name_records_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let args = AddArgs {
            names: vec!["shaders/base.rshs".into()],
            file_name: Some("common.rpak".into()),
        };
        run(&args, &globals(&path), &GuidmapConfig::default()).unwrap();

        let store = CacheStore::new();
        store.load_from_file(&path).unwrap();
        let entry = store.lookup_guid(store.guid_of("shaders/base.rshs")).unwrap();
        assert_eq!(entry.file_name(), Some("common.rpak"));
    }

    #[test]
    fn add_appends_to_existing_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let global = globals(&path);
        let config = GuidmapConfig::default();
        for name in ["a", "b"] {
            let args = AddArgs {
                names: vec![name.into()],
                file_name: None,
            };
            run(&args, &global, &config).unwrap();
        }
        let store = CacheStore::new();
        assert_eq!(store.load_from_file(&path).unwrap(), 2);
    }

    #[test]
    fn hash_does_not_create_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let args = HashArgs {
            names: vec!["x".into()],
        };
        assert_eq!(run_hash(&args, &globals(&path)).unwrap(), 0);
        assert!(!path.exists());
    }
}
