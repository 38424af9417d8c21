// tests/properties.rs

//! Schema, generator and metadata properties across settings.

use lava_recipe::recipe::generate::generate;
use lava_recipe::recipe::package_info::{link_libraries, package_info};
use lava_recipe::recipe::{resolve_schema, OptionKey, OptionOverrides, OptionSlot, PackageLayout};
use lava_recipe::{Arch, Compiler, CompilerVersion, Libcxx, Os, Settings};
use std::path::Path;

const COMPILERS: [Compiler; 4] = [
    Compiler::Gcc,
    Compiler::Clang,
    Compiler::AppleClang,
    Compiler::Msvc,
];

fn layout() -> PackageLayout {
    PackageLayout::new(Path::new("/opt/liblava-0.8.0"))
}

#[test]
fn test_fpic_schema_for_every_os() {
    for os in Os::ALL {
        let schema = resolve_schema(os);
        let resolved = schema.resolve(&OptionOverrides::new()).unwrap();
        if os == Os::Windows {
            assert_eq!(schema.slot(OptionKey::Fpic), &OptionSlot::Absent);
            assert_eq!(resolved.get_safe(OptionKey::Fpic), None);
        } else {
            assert_eq!(schema.slot(OptionKey::Fpic).default_value(), Some(true));
            assert_eq!(resolved.get_safe(OptionKey::Fpic), Some(true));
        }
        assert_eq!(resolved.get_safe(OptionKey::Test), Some(false));
        assert_eq!(resolved.get_safe(OptionKey::Demo), Some(false));
    }
}

#[test]
fn test_generator_is_pure() {
    for os in Os::ALL {
        for compiler in COMPILERS {
            let settings = Settings::new(os, Arch::Armv8, compiler, CompilerVersion::new(15, 0));
            let options = resolve_schema(os).resolve(&OptionOverrides::new()).unwrap();
            let a = generate(&options, &settings);
            let b = generate(&options, &settings);
            assert_eq!(a, b);
            assert_eq!(a.render_toolchain(), b.render_toolchain());
            assert_eq!(
                a.dependencies.to_json().unwrap(),
                b.dependencies.to_json().unwrap()
            );
        }
    }
}

#[test]
fn test_libs_vary_only_by_physfs_name() {
    let reference = link_libraries(Compiler::Gcc);
    for os in Os::ALL {
        for compiler in COMPILERS {
            for libcxx in [None, Some(Libcxx::Libstdcxx11), Some(Libcxx::Libcxx)] {
                let mut settings =
                    Settings::new(os, Arch::X86_64, compiler, CompilerVersion::new(14, 0));
                if let Some(libcxx) = libcxx {
                    settings = settings.with_libcxx(libcxx);
                }
                let libs = package_info(&layout(), &settings).libs;
                assert_eq!(libs.len(), reference.len());
                for (i, (got, want)) in libs.iter().zip(&reference).enumerate() {
                    if want == "physfs" {
                        let expected = if compiler == Compiler::Msvc {
                            "physfs-static"
                        } else {
                            "physfs"
                        };
                        assert_eq!(got, expected, "position {}", i);
                    } else {
                        assert_eq!(got, want, "position {}", i);
                    }
                }
            }
        }
    }
}

#[test]
fn test_stdcxxfs_exactly_once() {
    for compiler in [Compiler::Gcc, Compiler::Clang] {
        let settings = Settings::new(Os::Linux, Arch::X86_64, compiler, CompilerVersion::new(9, 0))
            .with_libcxx(Libcxx::Libstdcxx11);
        let info = package_info(&layout(), &settings);
        assert_eq!(info.system_libs.iter().filter(|l| *l == "stdc++fs").count(), 1);
    }
}

#[test]
fn test_pthread_exactly_once_for_gnu_like() {
    for compiler in [Compiler::Gcc, Compiler::Clang] {
        let settings = Settings::new(Os::Linux, Arch::X86_64, compiler, CompilerVersion::new(16, 0))
            .with_libcxx(Libcxx::Libstdcxx11);
        let info = package_info(&layout(), &settings);
        assert_eq!(info.sharedlinkflags.iter().filter(|f| *f == "-pthread").count(), 1);
        assert_eq!(info.exelinkflags.iter().filter(|f| *f == "-pthread").count(), 1);
        assert_eq!(info.system_libs, ["stdc++fs", "dl"]);
    }
}
