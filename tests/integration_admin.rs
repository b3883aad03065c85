mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{TestUser, create_test_user, send, setup_test_app, token_for};
use studyhub::studyhub_models::users::Role;

async fn create_admin(pool: &PgPool) -> TestUser {
    create_test_user(pool, "Admin", Role::Admin, None, true).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_routes_require_admin(pool: PgPool) {
    let student = create_test_user(&pool, "Student", Role::Student, None, true).await;
    let cr = create_test_user(&pool, "CR", Role::Cr, Some(("A", "60", "Fall 2024")), true).await;
    let app = setup_test_app(pool);

    let (status, _) = send(&app, "GET", "/api/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for user in [&student, &cr] {
        let (status, body) =
            send(&app, "GET", "/api/admin/users", Some(&token_for(user)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let cr = create_test_user(&pool, "CR", Role::Cr, Some(("A", "60", "Fall 2024")), true).await;
    create_test_user(&pool, "Unverified", Role::Student, None, false).await;
    let app = setup_test_app(pool.clone());

    send(
        &app,
        "POST",
        "/api/resources",
        Some(&token_for(&cr)),
        Some(json!({ "title": "Stats notes", "link": "https://example.com/s", "subject": "statistic" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/user/courses",
        Some(&token_for(&cr)),
        Some(json!({ "courseName": "Stats", "teacherName": "Dr. S", "coursePassword": "pass1" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/admin/stats", Some(&token_for(&admin)), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"]["total"], 3);
    assert_eq!(body["users"]["verified"], 2);
    assert_eq!(body["users"]["admins"], 1);
    assert_eq!(body["users"]["crs"], 1);
    assert_eq!(body["users"]["students"], 1);
    assert_eq!(body["resources"]["total"], 1);
    assert_eq!(body["resources"]["approved"], 1);
    assert_eq!(body["resources"]["pending"], 0);
    assert_eq!(body["totalCourses"], 1);
    assert_eq!(body["recentUsers"].as_array().unwrap().len(), 3);
    assert_eq!(body["recentResources"][0]["title"], "Stats notes");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_and_get_users(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let student = create_test_user(&pool, "Priya Shah", Role::Student, None, true).await;
    create_test_user(&pool, "CR", Role::Cr, Some(("A", "60", "Fall 2024")), true).await;
    let app = setup_test_app(pool);
    let token = token_for(&admin);

    let (status, body) = send(&app, "GET", "/api/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (_, body) = send(&app, "GET", "/api/admin/users?role=cr", Some(&token), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["users"][0]["isCR"], true);

    let (_, body) = send(&app, "GET", "/api/admin/users?search=priya", Some(&token), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["users"][0]["email"], student.email);

    let (status, _) = send(&app, "GET", "/api/admin/users?role=wizard", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/admin/users/{}", student.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Priya Shah");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/admin/users/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promote_to_cr(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let student = create_test_user(&pool, "Quinn", Role::Student, Some(("B", "61", "Fall 2024")), true)
        .await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}/role", student.id),
        Some(&token_for(&admin)),
        Some(json!({ "role": "cr" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "cr");
    assert_eq!(body["user"]["isCR"], true);

    // The new role applies on the next request with the same token
    let (status, _) = send(
        &app,
        "POST",
        "/api/user/courses",
        Some(&token_for(&student)),
        Some(json!({ "courseName": "Networks", "teacherName": "Dr. N", "coursePassword": "pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_cr_per_cohort(pool: PgPool) {
    let admin = create_admin(&pool).await;
    create_test_user(&pool, "Existing CR", Role::Cr, Some(("A", "60", "Fall 2024")), true).await;
    let rival = create_test_user(&pool, "Rival", Role::Student, Some(("A", "60", "Spring 2025")), true)
        .await;
    let other = create_test_user(&pool, "Other", Role::Student, Some(("B", "60", "Fall 2024")), true)
        .await;
    let app = setup_test_app(pool.clone());
    let token = token_for(&admin);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}/role", rival.id),
        Some(&token),
        Some(json!({ "role": "cr" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let role: Role = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(rival.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, Role::Student);

    // A different section is free
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}/role", other.id),
        Some(&token),
        Some(json!({ "role": "cr" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Moving that CR into the taken cohort is refused too
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}", other.id),
        Some(&token),
        Some(json!({ "section": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_change_own_role(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}/role", admin.id),
        Some(&token_for(&admin)),
        Some(json!({ "role": "student" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_role_rejects_unknown_role(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let student = create_test_user(&pool, "Sam", Role::Student, None, true).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}/role", student.id),
        Some(&token_for(&admin)),
        Some(json!({ "role": "superuser" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_update_bypasses_cr_lock(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let cr = create_test_user(&pool, "Tara", Role::Cr, Some(("A", "60", "Fall 2024")), false).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/admin/users/{}", cr.id),
        Some(&token_for(&admin)),
        Some(json!({ "isVerified": true, "semester": "Spring 2025" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isVerified"], true);
    assert_eq!(body["user"]["semester"], "Spring 2025");
    assert_eq!(body["user"]["section"], "A");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_user_cascades(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let cr = create_test_user(&pool, "Uma", Role::Cr, Some(("A", "60", "Fall 2024")), true).await;
    let app = setup_test_app(pool.clone());
    let cr_token = token_for(&cr);

    send(
        &app,
        "POST",
        "/api/user/courses",
        Some(&cr_token),
        Some(json!({ "courseName": "Doomed", "teacherName": "Dr. D", "coursePassword": "pass1" })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/resources",
        Some(&cr_token),
        Some(json!({ "title": "Doomed notes", "link": "https://example.com/d", "subject": "others" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/admin/users/{}", cr.id),
        Some(&token_for(&admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (courses, enrollments, resources): (i64, i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM courses), (SELECT COUNT(*) FROM course_enrollments), (SELECT COUNT(*) FROM resources)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((courses, enrollments, resources), (0, 0, 0));

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/users/{}", cr.id),
        Some(&token_for(&admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_delete_self(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/users/{}", admin.id),
        Some(&token_for(&admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(admin.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(exists);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_moderation(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let author = create_test_user(&pool, "Vic", Role::Student, None, true).await;
    let app = setup_test_app(pool);
    let token = token_for(&admin);

    let (_, resource) = send(
        &app,
        "POST",
        "/api/resources",
        Some(&token_for(&author)),
        Some(json!({ "title": "Borderline", "link": "https://example.com/b", "subject": "computer" })),
    )
    .await;
    let id = resource["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/admin/resources/{}/status", id),
        Some(&token),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");

    let (_, body) = send(&app, "GET", "/api/resources", None, None).await;
    assert_eq!(body["total"], 0);

    let (_, body) = send(
        &app,
        "GET",
        "/api/admin/resources?status=rejected",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);

    let (_, body) = send(&app, "GET", "/api/admin/resources", Some(&token), None).await;
    assert_eq!(body["total"], 1);

    // Flat enum: any state can follow any other
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/admin/resources/{}/status", id),
        Some(&token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/admin/resources/{}/status", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/admin/resources/{}/status", id),
        Some(&token),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_gets_resource_in_any_status(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let author = create_test_user(&pool, "Wren", Role::Student, None, true).await;
    let app = setup_test_app(pool);
    let token = token_for(&admin);

    let (_, resource) = send(
        &app,
        "POST",
        "/api/resources",
        Some(&token_for(&author)),
        Some(json!({ "title": "Draft notes", "link": "https://example.com/d", "subject": "math" })),
    )
    .await;
    let id = resource["id"].as_str().unwrap().to_string();
    let uri = format!("/api/admin/resources/{}", id);

    send(
        &app,
        "PATCH",
        &format!("{}/status", uri),
        Some(&token),
        Some(json!({ "status": "pending" })),
    )
    .await;

    let (status, _) = send(&app, "GET", &format!("/api/resources/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Draft notes");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["authorName"], "Wren");
    assert_eq!(body["authorEmail"], author.email);

    let (status, _) = send(&app, "GET", &uri, Some(&token_for(&author)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/admin/resources/{}", uuid::Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_user_emails(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let ann = create_test_user(&pool, "Ann", Role::Student, None, true).await;
    let ben = create_test_user(&pool, "Ben", Role::Student, None, true).await;
    create_test_user(&pool, "Cid", Role::Student, None, true).await;
    let app = setup_test_app(pool);
    let token = token_for(&admin);

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/users/emails",
        Some(&token),
        Some(json!({ "userIds": [ann.id, ben.id, uuid::Uuid::new_v4()] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let mut found: Vec<(String, String)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| {
            (
                u["id"].as_str().unwrap().to_string(),
                u["email"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    found.sort();
    let mut expected = vec![
        (ann.id.to_string(), ann.email.clone()),
        (ben.id.to_string(), ben.email.clone()),
    ];
    expected.sort();
    assert_eq!(found, expected);

    for payload in [json!({ "userIds": [] }), json!({}), json!({ "userIds": ["nope"] })] {
        let (status, body) =
            send(&app, "POST", "/api/admin/users/emails", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/users/emails",
        Some(&token_for(&ann)),
        Some(json!({ "userIds": [ben.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
