//! Integration tests for a full resolve pass.

use sdkgate::config::CapabilityTable;
use sdkgate::platform::PlatformId;
use sdkgate::resolver::{ResolveContext, ResolveOutcome, Resolver};
use sdkgate::scanner::ModuleScanner;
use sdkgate::stager::StageStatus;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const TABLE: &str = r#"
plugin: OmniCapture
variables:
  nvenc_dir: ${plugin_dir}/ThirdParty/NVENC
definitions:
  WITH_OMNI_NVENC: 1
platforms:
  win64:
    dependencies: [D3D11RHI, D3D12RHI]
    system_libraries: [d3d11.lib, d3d12.lib, dxgi.lib]
capabilities:
  - id: foo
    definition: WITH_FOO
    modules:
      prefixes: [Foo]
  - id: openexr
    definition: WITH_OMNICAPTURE_OPENEXR
    modules:
      prefixes: [OpenEXR, OpenExr]
      companions: [Imath]
  - id: nvenc
    definition: WITH_OMNICAPTURE_NVENC
    also_define: [OMNI_WITH_D3D11_RHI, OMNI_WITH_D3D12_RHI]
    platforms: [win64]
    artifacts:
      - kind: directory
        path: ${nvenc_dir}
        description: NVENC root directory
      - kind: directory
        path: ${nvenc_dir}/Interface
        description: NVENC Interface directory
      - kind: file
        path: ${nvenc_dir}/Interface/nvEncodeAPI.h
        description: Header nvEncodeAPI.h
      - kind: file
        path: ${nvenc_dir}/Win64/nvEncodeAPI64.dll
        description: Runtime nvEncodeAPI64.dll
    include_paths:
      - ${nvenc_dir}/Interface
    delay_load: [nvEncodeAPI64.dll]
    runtime_dependencies:
      - $(PluginDir)/ThirdParty/NVENC/Win64/nvEncodeAPI64.dll
    import_libraries:
      candidates:
        - ${nvenc_dir}/Lib/Win64
        - ${nvenc_dir}/Lib/x64
      names: [nvencodeapi.lib, nvcuvid.lib]
    stage:
      source: ${nvenc_dir}/Win64/nvEncodeAPI64.dll
      destinations:
        - ${plugin_dir}/Binaries/Win64
        - ${plugin_dir}/Binaries/ThirdParty/Win64
"#;

fn table() -> CapabilityTable {
    serde_yaml::from_str(TABLE).unwrap()
}

fn install_nvenc(plugin: &Path) {
    let root = plugin.join("ThirdParty/NVENC");
    fs::create_dir_all(root.join("Interface")).unwrap();
    fs::create_dir_all(root.join("Win64")).unwrap();
    fs::write(root.join("Interface/nvEncodeAPI.h"), "// nvenc").unwrap();
    fs::write(root.join("Win64/nvEncodeAPI64.dll"), "MZ").unwrap();
}

fn write_descriptor(root: &Path, relative: &str, module: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        format!(
            "using UnrealBuildTool;\n\npublic class {} : ModuleRules\n{{\n}}\n",
            module
        ),
    )
    .unwrap();
}

fn resolve_win64(plugin: &Path, sdk: Option<&Path>) -> ResolveOutcome {
    let mut context = ResolveContext::new(PlatformId::Win64, plugin);
    if let Some(sdk) = sdk {
        context = context.with_sdk_root(sdk);
    }
    Resolver::new(table(), context).run().unwrap()
}

fn set_mtime(path: &Path, mtime: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

#[test]
fn all_artifacts_present_enables_nvenc() {
    let plugin = TempDir::new().unwrap();
    install_nvenc(plugin.path());

    let outcome = resolve_win64(plugin.path(), None);
    let config = &outcome.config;

    assert!(config.enabled_capabilities.contains("nvenc"));
    assert!(config.is_defined("WITH_OMNICAPTURE_NVENC"));
    assert!(config.is_defined("OMNI_WITH_D3D11_RHI"));
    assert!(config.is_defined("OMNI_WITH_D3D12_RHI"));
    assert_eq!(
        config.extra_include_paths,
        vec![plugin.path().join("ThirdParty/NVENC/Interface")]
    );
    assert_eq!(config.delay_load_libraries, vec!["nvEncodeAPI64.dll"]);
    assert_eq!(config.system_libraries, vec!["d3d11.lib", "d3d12.lib", "dxgi.lib"]);
    assert_eq!(config.extra_dependencies, vec!["D3D11RHI", "D3D12RHI"]);
    // No import libraries installed: explicit linking is skipped, the capability stays on.
    assert!(config.extra_libraries.is_empty());
}

#[test]
fn removing_any_artifact_disables_and_reports_it() {
    let files = [
        ("ThirdParty/NVENC/Interface/nvEncodeAPI.h", "Header nvEncodeAPI.h"),
        ("ThirdParty/NVENC/Win64/nvEncodeAPI64.dll", "Runtime nvEncodeAPI64.dll"),
    ];

    for (relative, description) in files {
        let plugin = TempDir::new().unwrap();
        install_nvenc(plugin.path());
        fs::remove_file(plugin.path().join(relative)).unwrap();

        let outcome = resolve_win64(plugin.path(), None);
        let nvenc = &outcome.reports[2];
        assert!(!nvenc.outcome.enabled, "{} removed", relative);
        assert_eq!(nvenc.outcome.missing.len(), 1);
        assert!(nvenc.outcome.missing[0].starts_with(description));
        assert_eq!(outcome.config.definitions["WITH_OMNICAPTURE_NVENC"], 0);
        assert_eq!(outcome.config.definitions["OMNI_WITH_D3D11_RHI"], 0);
    }
}

#[test]
fn missing_root_directory_explains_everything_beneath_it() {
    let plugin = TempDir::new().unwrap();

    let outcome = resolve_win64(plugin.path(), None);
    let missing = &outcome.reports[2].outcome.missing;
    assert_eq!(missing.len(), 1);
    assert!(missing[0].starts_with("NVENC root directory (expected at"));
}

#[test]
fn every_capability_has_a_zero_or_one_definition() {
    let plugin = TempDir::new().unwrap();

    for platform in PlatformId::ALL {
        let context = ResolveContext::new(platform, plugin.path());
        let outcome = Resolver::new(table(), context).run().unwrap();

        for capability in &table().capabilities {
            for name in capability.definition_names() {
                let value = outcome.config.definitions[name];
                assert!(value == 0 || value == 1, "{} on {}", name, platform);
            }
        }
    }
}

#[test]
fn staging_twice_copies_once() {
    let plugin = TempDir::new().unwrap();
    install_nvenc(plugin.path());

    let first = resolve_win64(plugin.path(), None);
    assert_eq!(first.staging[0].copies(), 2);

    let staged = plugin.path().join("Binaries/Win64/nvEncodeAPI64.dll");
    let mtime = fs::metadata(&staged).unwrap().modified().unwrap();

    let second = resolve_win64(plugin.path(), None);
    assert_eq!(second.staging[0].copies(), 0);
    assert!(second.staging[0]
        .destinations
        .iter()
        .all(|d| d.status == StageStatus::UpToDate));
    assert_eq!(fs::metadata(&staged).unwrap().modified().unwrap(), mtime);
}

#[test]
fn newer_source_is_copied_again_once() {
    let plugin = TempDir::new().unwrap();
    install_nvenc(plugin.path());
    resolve_win64(plugin.path(), None);

    let source = plugin.path().join("ThirdParty/NVENC/Win64/nvEncodeAPI64.dll");
    let bumped = fs::metadata(&source).unwrap().modified().unwrap() + Duration::from_secs(3600);
    set_mtime(&source, bumped);

    let after_bump = resolve_win64(plugin.path(), None);
    for destination in &after_bump.staging[0].destinations {
        assert_eq!(destination.status, StageStatus::Copied);
    }

    let settled = resolve_win64(plugin.path(), None);
    assert_eq!(settled.staging[0].copies(), 0);
}

#[test]
fn openexr_prefix_variants_are_unioned() {
    let sdk = TempDir::new().unwrap();
    write_descriptor(sdk.path(), "OpenEXR/OpenEXR.Build.cs", "OpenEXR");
    write_descriptor(sdk.path(), "Legacy/OpenExrUtil.Build.cs", "OpenExrUtil");
    write_descriptor(sdk.path(), "Imath/Imath.Build.cs", "Imath");

    let scanner = ModuleScanner::new();
    let upper = scanner.scan(sdk.path(), "OpenEXR");
    let lower = scanner.scan(sdk.path(), "OpenExr");
    let union = scanner.scan_variants(sdk.path(), &["OpenEXR", "OpenExr"]);
    assert_eq!(upper.len() + lower.len(), union.len());

    let plugin = TempDir::new().unwrap();
    let outcome = resolve_win64(plugin.path(), Some(sdk.path()));
    assert!(outcome.config.is_defined("WITH_OMNICAPTURE_OPENEXR"));
    assert_eq!(
        outcome.reports[1].modules,
        vec!["OpenEXR".to_string(), "OpenExrUtil".to_string()]
    );
    assert!(outcome
        .config
        .extra_dependencies
        .ends_with(&["OpenEXR".to_string(), "OpenExrUtil".to_string(), "Imath".to_string()]));
}

#[test]
fn absent_sdk_root_disables_module_capabilities_without_error() {
    let plugin = TempDir::new().unwrap();
    let nowhere = plugin.path().join("does-not-exist");

    for sdk in [None, Some(nowhere.as_path())] {
        let outcome = resolve_win64(plugin.path(), sdk);
        assert_eq!(outcome.config.definitions["WITH_FOO"], 0);
        assert_eq!(outcome.config.definitions["WITH_OMNICAPTURE_OPENEXR"], 0);
        assert!(!outcome.reports[0].outcome.missing.is_empty());
    }
}

#[test]
fn single_foobar_descriptor_enables_foo() {
    let sdk = TempDir::new().unwrap();
    write_descriptor(sdk.path(), "Source/FooBar/FooBar.Build.cs", "FooBar");
    let plugin = TempDir::new().unwrap();

    let outcome = resolve_win64(plugin.path(), Some(sdk.path()));
    assert_eq!(outcome.reports[0].modules, vec!["FooBar".to_string()]);
    assert!(outcome.config.enabled_capabilities.contains("foo"));
    assert_eq!(outcome.config.definitions["WITH_FOO"], 1);
}

#[test]
fn unwritable_destination_fails_softly() {
    let plugin = TempDir::new().unwrap();
    install_nvenc(plugin.path());
    // A regular file where the destination's parent directory should be.
    fs::write(plugin.path().join("Binaries"), "not a directory").unwrap();

    let staged = resolve_win64(plugin.path(), None);
    assert!(staged.staging[0]
        .destinations
        .iter()
        .all(|d| matches!(d.status, StageStatus::Failed { .. })));
    assert_eq!(staged.side_effect_failures(), 2);

    let context = ResolveContext::new(PlatformId::Win64, plugin.path());
    let read_only = Resolver::new(table(), context)
        .without_staging()
        .run()
        .unwrap();
    assert_eq!(staged.config, read_only.config);
}

#[test]
fn identical_inputs_give_identical_fingerprints() {
    let plugin = TempDir::new().unwrap();
    install_nvenc(plugin.path());

    let first = resolve_win64(plugin.path(), None);
    let second = resolve_win64(plugin.path(), None);
    assert_eq!(first.config.fingerprint, second.config.fingerprint);

    let linux = Resolver::new(table(), ResolveContext::new(PlatformId::Linux, plugin.path()))
        .run()
        .unwrap();
    assert_ne!(first.config.fingerprint, linux.config.fingerprint);
}
