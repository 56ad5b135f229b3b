use clap::Parser;
use noteboard::cli::args::{Args, Command};
use std::path::PathBuf;

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["noteboard", "-v"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_list_command_when_parsing_then_defaults_to_text_output() {
    // Arrange
    let args = vec!["noteboard", "list"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List { json } => assert!(!json),
        _ => panic!("Expected List command"),
    }
    assert_eq!(parsed.config, None);
    assert_eq!(parsed.verbose, 0);
}

#[test]
fn given_create_with_image_when_parsing_then_captures_all_fields() {
    // Arrange
    let args = vec![
        "noteboard",
        "create",
        "--name",
        "Milk",
        "--description",
        "2%",
        "--image",
        "pic.png",
    ];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Create {
            name,
            description,
            image,
        } => {
            assert_eq!(name, "Milk");
            assert_eq!(description, "2%");
            assert_eq!(image, Some(PathBuf::from("pic.png")));
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn given_create_without_description_when_parsing_then_fails() {
    let result = Args::try_parse_from(vec!["noteboard", "create", "--name", "Milk"]);

    assert!(result.is_err());
}

#[test]
fn given_delete_command_when_parsing_then_keeps_opaque_id() {
    // Arrange
    let args = vec!["noteboard", "delete", "3f2a-42"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Delete { note_id } => assert_eq!(note_id, "3f2a-42"),
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn given_global_config_flag_after_subcommand_when_parsing_then_succeeds() {
    // Arrange
    let args = vec!["noteboard", "delete", "42", "-c", "/tmp/noteboard.toml", "-vv"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert_eq!(parsed.config, Some(PathBuf::from("/tmp/noteboard.toml")));
    assert_eq!(parsed.verbose, 2);
}

#[test]
fn given_login_command_when_parsing_then_username_optional() {
    let parsed = Args::try_parse_from(vec!["noteboard", "login", "--token", "jwt"]).unwrap();

    match parsed.command {
        Command::Login { token, username } => {
            assert_eq!(token, "jwt");
            assert_eq!(username, None);
        }
        _ => panic!("Expected Login command"),
    }
}

#[test]
fn given_logout_command_when_parsing_then_succeeds() {
    let parsed = Args::try_parse_from(vec!["noteboard", "logout"]).unwrap();

    assert!(matches!(parsed.command, Command::Logout));
}
