mod common;

use common::{StubDriver, options};
use custom_db_scripts::{
    BcryptHasher, CustomDatabase, ErrorKind, QueryResult, RelationalDatabase, Row,
};

const LOGIN_QUERY: &str = "select ID, EMAIL, PASSWORD, NICKNAME from Users where EMAIL = :email";

fn database(driver: &StubDriver) -> RelationalDatabase<StubDriver, BcryptHasher> {
    RelationalDatabase::new(driver.clone(), BcryptHasher::new(4), options())
}

fn duck_row(password: &str) -> Row {
    Row::new()
        .with("ID", "uid1")
        .with("EMAIL", "duck.t@example.com")
        .with("NICKNAME", "T-Duck")
        .with("PASSWORD", bcrypt::hash(password, 4).unwrap())
}

#[tokio::test]
async fn test_returns_database_error() {
    let driver = StubDriver::failing_query("test db error");

    let err = database(&driver)
        .login("broken@example.com", "password")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::QueryError);
    assert_eq!(err.to_string(), "test db error");
    assert_eq!(driver.closed(), 1);
}

#[tokio::test]
async fn test_returns_error_if_no_such_user() {
    for identifier in ["missing@example.com", "someone@else.org", "not-an-email"] {
        let driver = StubDriver::rows(QueryResult::default());

        let err = database(&driver)
            .login(identifier, "password")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFoundError);
        assert_eq!(err.to_string(), identifier);
        assert_eq!(driver.opened(), 1);
        assert_eq!(driver.closed(), 1);
    }
}

#[tokio::test]
async fn test_returns_hash_error() {
    let driver = StubDriver::rows(QueryResult::with_rows(vec![Row::new()]));

    let err = database(&driver)
        .login("empty@example.com", "password")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HashError);
    assert_eq!(err.to_string(), "data and hash arguments required");
    assert_eq!(driver.closed(), 1);
}

#[tokio::test]
async fn test_returns_error_if_password_is_incorrect() {
    let driver = StubDriver::rows(QueryResult::with_rows(vec![
        Row::new().with("PASSWORD", "random-hash"),
    ]));

    let err = database(&driver)
        .login("duck.t@example.com", "wrongPassword")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidSecretError);
    assert_eq!(err.to_string(), "duck.t@example.com");
    assert_eq!(driver.closed(), 1);
}

#[tokio::test]
async fn test_wrong_password_against_real_hash() {
    let driver = StubDriver::rows(QueryResult::with_rows(vec![duck_row("password")]));

    let err = database(&driver)
        .login("duck.t@example.com", "wrongPassword")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidSecretError);
    assert_eq!(err.to_string(), "duck.t@example.com");
    assert_eq!(driver.closed(), 1);
}

#[tokio::test]
async fn test_returns_user_data() {
    let driver = StubDriver::rows(QueryResult::with_rows(vec![duck_row("password")]));

    let user = database(&driver)
        .login("duck.t@example.com", "password")
        .await
        .unwrap();

    assert_eq!(user.user_id, "uid1");
    assert_eq!(user.email, "duck.t@example.com");
    assert_eq!(user.nickname, "T-Duck");

    assert_eq!(
        driver.statements(),
        vec![(LOGIN_QUERY.to_string(), vec!["duck.t@example.com".to_string()])]
    );
    assert_eq!(driver.options(), vec![options()]);
    assert_eq!(driver.opened(), 1);
    assert_eq!(driver.closed(), 1);
}

// The profile reports the submitted identifier even when the stored
// column differs (case, aliasing).
#[tokio::test]
async fn test_email_is_submitted_identifier() {
    let row = duck_row("password").with("EMAIL", "Duck.T@Example.com");
    let driver = StubDriver::rows(QueryResult::with_rows(vec![row]));

    let user = database(&driver)
        .login("duck.t@example.com", "password")
        .await
        .unwrap();

    assert_eq!(user.email, "duck.t@example.com");
}

#[tokio::test]
async fn test_uses_first_row_only() {
    let other = Row::new()
        .with("ID", "uid2")
        .with("NICKNAME", "Other")
        .with("PASSWORD", bcrypt::hash("password", 4).unwrap());
    let driver = StubDriver::rows(QueryResult::with_rows(vec![duck_row("password"), other]));

    let user = database(&driver)
        .login("duck.t@example.com", "password")
        .await
        .unwrap();

    assert_eq!(user.user_id, "uid1");
}

#[tokio::test]
async fn test_connection_failure_is_propagated_without_query() {
    let driver = StubDriver::failing_connect("ORA-12541: TNS:no listener");

    let err = database(&driver)
        .login("duck.t@example.com", "password")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionError);
    assert_eq!(err.to_string(), "ORA-12541: TNS:no listener");
    assert!(driver.statements().is_empty());
    assert_eq!(driver.opened(), 0);
    assert_eq!(driver.closed(), 0);
}

#[tokio::test]
async fn test_close_failure_does_not_mask_result() {
    let driver =
        StubDriver::rows(QueryResult::with_rows(vec![duck_row("password")])).failing_close("gone");

    let user = database(&driver)
        .login("duck.t@example.com", "password")
        .await
        .unwrap();

    assert_eq!(user.user_id, "uid1");
    assert_eq!(driver.closed(), 1);
}

#[tokio::test]
async fn test_concurrent_logins_are_independent() {
    let driver = StubDriver::answering(|_, params| {
        if params[0] == "duck.t@example.com" {
            Ok(QueryResult::with_rows(vec![duck_row("password")]))
        } else {
            Ok(QueryResult::default())
        }
    });
    let db = database(&driver);

    let (found, missing) = tokio::join!(
        db.login("duck.t@example.com", "password"),
        db.login("missing@example.com", "password"),
    );

    assert_eq!(found.unwrap().user_id, "uid1");
    assert_eq!(missing.unwrap_err().kind(), ErrorKind::NotFoundError);
    assert_eq!(driver.opened(), 2);
    assert_eq!(driver.closed(), 2);
}
