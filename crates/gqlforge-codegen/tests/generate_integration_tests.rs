//! End-to-end generation tests.
//!
//! Each test lays out a small Go module in a temp directory, runs the
//! generator over it and inspects the written schema files.

#![allow(non_snake_case)]

use gqlforge_codegen::{FileStatus, Generator};
use gqlforge_core::{
    DiscoveryStrategy, ErrorKind, GeneratorConfig, KeepPosition, OutputStrategy,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp Go project with a generator config pointing at it
struct Project {
    dir: TempDir,
    config: GeneratorConfig,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = GeneratorConfig::new();
        config.roots = vec![format!("{}/...", dir.path().display())];
        config.output = dir.path().join("graph");
        Self { dir, config }
    }

    fn file(self, rel: &str, content: &str) -> Self {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn output(&self, rel: &str) -> PathBuf {
        self.config.output.join(rel)
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.output(rel)).unwrap()
    }

    fn run(&self) -> gqlforge_codegen::GenerationReport {
        Generator::new(self.config.clone()).unwrap().run().unwrap()
    }
}

fn relative_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walk(root)
        .into_iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.extend(walk(&path));
        } else {
            out.push(path);
        }
    }
    out
}

const USER_DTO: &str = r#"package models

// @gqlType
// @gqlInput
type UserDTO struct {
    Name string
}
"#;

// ============================================================================
// Naming and visibility scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn generate___strip_suffix_and_type_prefix___renames_type() {
        let mut project = Project::new().file("models/user.go", USER_DTO);
        project.config.naming.strip_suffixes = vec!["DTO".to_string()];
        project.config.naming.type_prefix = "Gql".to_string();

        project.run();

        let schema = project.read("schema.graphqls");
        assert!(schema.contains("type GqlUser {\n  name: String!\n}\n"));
        assert!(!schema.contains("UserDTO"));
    }

    #[test]
    fn generate___strip_suffix_and_input_suffix___renames_input() {
        let mut project = Project::new().file("models/user.go", USER_DTO);
        project.config.naming.strip_suffixes = vec!["DTO".to_string()];
        project.config.naming.input_suffix = "Payload".to_string();

        project.run();

        assert!(project
            .read("schema.graphqls")
            .contains("input UserInputPayload {\n  name: String!\n}\n"));
    }

    #[test]
    fn generate___ignore_all___keeps_only_included_fields() {
        let project = Project::new().file(
            "models/account.go",
            r#"package models

// @gqlType(ignoreAll)
type Account struct {
    ID     string `gql:",include:*"`
    Secret string
}
"#,
        );

        project.run();

        assert!(project
            .read("schema.graphqls")
            .contains("type Account {\n  id: ID!\n}\n"));
    }

    #[test]
    fn generate___include_overrides_json_omit() {
        let project = Project::new().file(
            "models/account.go",
            r#"package models

// @gqlType
type Account struct {
    Email    string
    Password string `json:"-" gql:",include"`
    Token    string `json:"-"`
}
"#,
        );

        project.run();

        assert!(project.read("schema.graphqls").contains(
            "type Account {\n  email: String!\n  password: String!\n}\n"
        ));
    }

    #[test]
    fn generate___shared_embedded_base___promoted_fields_first() {
        let project = Project::new()
            .file(
                "models/base.go",
                r#"package models

import "time"

type Base struct {
    ID        string
    CreatedAt time.Time
}
"#,
            )
            .file(
                "models/entities.go",
                r#"package models

// @gqlType
type User struct {
    Base
    Name string
}

// @gqlType
type Order struct {
    Base
    Total float64
}
"#,
            );

        project.run();

        let schema = project.read("schema.graphqls");
        assert!(schema.contains(
            "type User {\n  id: ID!\n  createdAt: Time!\n  name: String!\n}\n"
        ));
        assert!(schema.contains(
            "type Order {\n  id: ID!\n  createdAt: Time!\n  total: Float!\n}\n"
        ));
        assert!(schema.find("type User").unwrap() < schema.find("type Order").unwrap());
    }

    #[test]
    fn generate___descriptions_and_deprecations_render() {
        let project = Project::new().file(
            "models/item.go",
            r#"package models

// Item in the catalogue.
// @gqlType
type Item struct {
    // Display title.
    Title string
    Sku   string `gql:",deprecated:'use code'"`
}
"#,
        );

        project.run();

        assert!(project.read("schema.graphqls").contains(
            "\"\"\"\nItem in the catalogue.\n\"\"\"\ntype Item {\n  \"\"\"\n  Display title.\n  \"\"\"\n  title: String!\n  sku: String! @deprecated(reason: \"use code\")\n}\n"
        ));
    }
}

// ============================================================================
// Idempotence and preserved regions
// ============================================================================

mod regions {
    use super::*;

    const SIMPLE: &str = "package models\n\n// @gqlType\ntype User struct {\n    Name string\n}\n";

    #[test]
    fn generate___second_run___byte_identical_and_unchanged() {
        let project = Project::new().file("models/user.go", SIMPLE);

        project.run();
        let first = project.read("schema.graphqls");
        let report = project.run();

        assert_eq!(project.read("schema.graphqls"), first);
        assert_eq!(report.files[0].status, FileStatus::Unchanged);
        assert_eq!(report.written, 0);
    }

    #[test]
    fn generate___bottom_region___survives_regeneration() {
        let project = Project::new().file("models/user.go", SIMPLE);
        project.run();

        let custom = "extend type User {\n  friends: [User!]!\n}\n";
        let edited = project
            .read("schema.graphqls")
            .replace("# @gqlKeepBegin\n", &format!("# @gqlKeepBegin\n{custom}"));
        fs::write(project.output("schema.graphqls"), &edited).unwrap();

        let report = project.run();

        let schema = project.read("schema.graphqls");
        assert_eq!(schema, edited);
        assert_eq!(report.files[0].status, FileStatus::Unchanged);
        assert!(schema.ends_with(&format!("# @gqlKeepBegin\n{custom}# @gqlKeepEnd\n")));
    }

    #[test]
    fn generate___top_region___survives_source_change() {
        let mut project = Project::new().file("models/user.go", SIMPLE);
        project.config.keep.position = KeepPosition::Top;
        project.run();

        let custom = "scalar Upload\n";
        let edited = project
            .read("schema.graphqls")
            .replace("# @gqlKeepBegin\n", &format!("# @gqlKeepBegin\n{custom}"));
        fs::write(project.output("schema.graphqls"), &edited).unwrap();

        let project = project.file(
            "models/user.go",
            "package models\n\n// @gqlType\ntype User struct {\n    Name string\n    Age  int\n}\n",
        );
        let report = project.run();

        let schema = project.read("schema.graphqls");
        assert_eq!(report.files[0].status, FileStatus::Updated);
        assert!(schema.contains("  age: Int!\n"));
        let region = format!("# @gqlKeepBegin\n{custom}# @gqlKeepEnd\n");
        assert!(schema.find(&region).unwrap() < schema.find("type User").unwrap());
    }

    #[test]
    fn generate___unterminated_region___io_error() {
        let project = Project::new().file("models/user.go", SIMPLE);
        fs::create_dir_all(project.output("")).unwrap();
        fs::write(
            project.output("schema.graphqls"),
            "# @gqlKeepBegin\nscalar Upload\n",
        )
        .unwrap();

        let err = Generator::new(project.config.clone())
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn generate___skip_existing___leaves_file_untouched() {
        let mut project = Project::new().file("models/user.go", SIMPLE);
        project.config.skip_existing = true;
        fs::create_dir_all(project.output("")).unwrap();
        fs::write(project.output("schema.graphqls"), "# hand written\n").unwrap();

        let report = project.run();

        assert_eq!(report.files[0].status, FileStatus::Skipped);
        assert_eq!(project.read("schema.graphqls"), "# hand written\n");
    }
}

// ============================================================================
// Output strategies
// ============================================================================

mod strategies {
    use super::*;

    fn two_packages() -> Project {
        Project::new()
            .file(
                "billing/invoice.go",
                r#"// @gqlNamespace(name: "finance/billing")
package billing

// @gqlType
type Invoice struct {
    Number string
}
"#,
            )
            .file(
                "users/user.go",
                r#"package users

// @gqlType
// @gqlInput
type UserProfile struct {
    Name string
}
"#,
            )
    }

    #[test]
    fn generate___multiple___one_file_per_artifact() {
        let mut project = two_packages();
        project.config.strategy = OutputStrategy::Multiple;

        let report = project.run();

        assert_eq!(
            relative_files(&project.config.output),
            vec![
                "finance/billing/invoice.graphqls",
                "user_profile.graphqls",
                "user_profile_input.graphqls",
            ]
        );
        assert_eq!(report.written, 3);
        assert!(project
            .read("user_profile_input.graphqls")
            .contains("input UserProfileInput {"));
    }

    #[test]
    fn generate___package___one_file_per_namespace() {
        let mut project = two_packages();
        project.config.strategy = OutputStrategy::Package;

        project.run();

        assert_eq!(
            relative_files(&project.config.output),
            vec!["finance/billing.graphqls", "users.graphqls"]
        );
        let users = project.read("users.graphqls");
        assert!(users.find("type UserProfile").unwrap() < users.find("input UserProfileInput").unwrap());
    }

    #[test]
    fn generate___multiple___file_name_collision_is_error() {
        let mut project = Project::new().file(
            "models/user.go",
            r#"package models

// @gqlType(name: "UserView")
type A struct { Name string }

// @gqlType(name: "User_View")
type B struct { Name string }
"#,
        );
        project.config.strategy = OutputStrategy::Multiple;

        let err = Generator::new(project.config.clone())
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Naming);
    }
}

// ============================================================================
// Cross-package resolution
// ============================================================================

mod cross_package {
    use super::*;

    fn shop() -> Project {
        Project::new()
            .file("go.mod", "module example.com/shop\n\ngo 1.22\n")
            .file(
                "status/status.go",
                r#"package status

// Lifecycle of an order.
// @gqlEnum
type Status string

const (
    StatusActive Status = "active"
    StatusClosed Status = "closed"
)
"#,
            )
            .file(
                "tools/legacy.go",
                r#"package legacy

import st "example.com/shop/status"

// @gqlEnumValue(deprecated: "migrated")
const StatusLegacy st.Status = "legacy"
"#,
            )
            .file(
                "models/order.go",
                r#"package models

import "example.com/shop/status"

// @gqlType
type Order struct {
    ID    int
    State status.Status
}
"#,
            )
    }

    #[test]
    fn generate___enum_values_link_across_packages() {
        let project = shop();

        project.run();

        let schema = project.read("schema.graphqls");
        assert!(schema.contains("type Order {\n  id: ID!\n  state: Status!\n}\n"));
        assert!(schema.contains(
            "\"\"\"\nLifecycle of an order.\n\"\"\"\nenum Status {\n  ACTIVE\n  CLOSED\n  LEGACY @deprecated(reason: \"migrated\")\n}\n"
        ));
    }

    #[test]
    fn generate___gqlgen_directives_use_import_paths() {
        let mut project = shop();
        project.config.use_gqlgen_directives = true;

        project.run();

        let schema = project.read("schema.graphqls");
        assert!(schema.contains("type Order @goModel(model: \"example.com/shop/models.Order\") {"));
        assert!(schema.contains("enum Status @goModel(model: \"example.com/shop/status.Status\") {"));
    }

    #[test]
    fn generate___extra_field_forces_resolver() {
        let mut project = Project::new()
            .file("go.mod", "module example.com/blog\n")
            .file(
                "models/post.go",
                r#"package models

// @gqlType
// @gqlExtraField(name: "comments", type: "[Comment!]!", description: "Loaded lazily")
type Post struct {
    Title string
}

// @gqlType
type Comment struct {
    Body string
}
"#,
            );
        project.config.use_gqlgen_directives = true;

        project.run();

        assert!(project.read("schema.graphqls").contains(
            "  title: String!\n  \"\"\"\n  Loaded lazily\n  \"\"\"\n  comments: [Comment!]! @goField(forceResolver: true)\n}\n"
        ));
    }
}

// ============================================================================
// Generics and discovery
// ============================================================================

mod resolution {
    use super::*;

    #[test]
    fn generate___generic_instantiation_substitutes_through_pointers_and_slices() {
        let project = Project::new().file(
            "models/page.go",
            r#"package models

// @gqlType
type Page[T any] struct {
    Items []*T
    Total int
}

// @gqlType
type User struct {
    Name string
}

// @gqlType
type Query struct {
    Users *Page[User]
}
"#,
        );

        project.run();

        let schema = project.read("schema.graphqls");
        assert!(schema.contains("type PageUser {\n  items: [User]!\n  total: Int!\n}\n"));
        assert!(schema.contains("type Query {\n  users: PageUser\n}\n"));
        assert!(!schema.contains("type Page "));
    }

    #[test]
    fn generate___referenced_discovery_follows_other_files() {
        let mut project = Project::new()
            .file(
                "models/order.go",
                r#"package models

// @gqlType
type Order struct {
    Customer Customer
}
"#,
            )
            .file(
                "models/customer.go",
                r#"package models

type Customer struct {
    Name string
}

type Unused struct {
    Name string
}
"#,
            );
        project.config.auto_discovery.strategy = DiscoveryStrategy::Referenced;

        let report = project.run();

        let schema = project.read("schema.graphqls");
        assert!(schema.contains("type Customer {\n  name: String!\n}\n"));
        assert!(schema.contains("type Order {\n  customer: Customer!\n}\n"));
        assert!(!schema.contains("Unused"));
        assert_eq!(report.blocks, 2);
    }

    #[test]
    fn generate___unknown_reference_without_discovery___resolution_error() {
        let project = Project::new().file(
            "models/order.go",
            r#"package models

// @gqlType
type Order struct {
    Customer Customer
}

type Customer struct {
    Name string
}
"#,
        );

        let err = Generator::new(project.config.clone())
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(!project.output("schema.graphqls").exists());
    }

    #[test]
    fn generate___embed_from_package_outside_roots___resolution_error() {
        let mut project = Project::new()
            .file("go.mod", "module example.com/shop\n\ngo 1.22\n")
            .file(
                "base/base.go",
                "package base\n\ntype Base struct {\n    ID int\n}\n",
            )
            .file(
                "models/user.go",
                r#"package models

import "example.com/shop/base"

// @gqlType
type User struct {
    base.Base
    Name string
}
"#,
            );
        project.config.roots = vec![format!("{}/models/...", project.dir.path().display())];

        let err = Generator::new(project.config.clone())
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.to_string().contains("base.Base"), "{err}");
        assert!(!project.output("schema.graphqls").exists());
    }

    #[test]
    fn generate___malformed_directive___directive_error_and_nothing_written() {
        let project = Project::new().file(
            "models/order.go",
            "package models\n\n// @gqlType(name: \"Broken)\ntype Order struct {\n    ID string\n}\n",
        );

        let err = Generator::new(project.config.clone())
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Directive);
        assert!(!project.config.output.exists());
    }
}
