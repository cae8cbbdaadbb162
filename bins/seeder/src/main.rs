//! Database seeder for Sekolah development and testing.
//!
//! Seeds a small branch tree, the system permissions, development users,
//! fee structures, and sample dues/payments for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use sekolah_core::access::{CROSS_BRANCH_ACCESS, MANAGE_ALL_BRANCHES, VIEW_ALL_BRANCHES};
use sekolah_core::auth::hash_password;
use sekolah_db::entities::{
    branches, fee_dues, fee_payments, fee_structures, permissions, role_permissions, roles,
    sea_orm_active_enums::{DueStatus, FeeRecurrence, PaymentStatus, UserRole},
    user_roles, users,
};

/// Root branch ID (consistent for all seeds)
const ROOT_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000001";
/// North campus branch ID
const NORTH_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000002";
/// South campus branch ID
const SOUTH_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000003";
/// North annex branch ID (child of north campus)
const NORTH_ANNEX_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000004";
/// Super admin user ID
const SUPER_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000010";
/// North campus branch admin user ID
const BRANCH_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000011";
/// Accountant user ID (registrar role with view-all override)
const ACCOUNTANT_ID: &str = "00000000-0000-0000-0000-000000000012";
/// Sample student ID
const STUDENT_ID: &str = "00000000-0000-0000-0000-000000000020";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = sekolah_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding branches...");
    seed_branches(&db).await;

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding permissions and roles...");
    seed_permissions(&db).await;

    println!("Seeding fee structures and dues...");
    seed_fees(&db).await;

    println!("Seeding complete!");
}

fn id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap()
}

async fn already_seeded(db: &DatabaseConnection) -> bool {
    branches::Entity::find_by_id(id(ROOT_BRANCH_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
}

/// Seeds the branch tree: main campus -> {north, south}, north -> annex.
async fn seed_branches(db: &DatabaseConnection) {
    if already_seeded(db).await {
        println!("  Branches already exist, skipping...");
        return;
    }

    let now = Utc::now();
    let tree = [
        (ROOT_BRANCH_ID, "Sekolah Main Campus", "MAIN", None),
        (NORTH_BRANCH_ID, "North Campus", "NORTH", Some(ROOT_BRANCH_ID)),
        (SOUTH_BRANCH_ID, "South Campus", "SOUTH", Some(ROOT_BRANCH_ID)),
        (
            NORTH_ANNEX_BRANCH_ID,
            "North Campus Annex",
            "NORTH-A",
            Some(NORTH_BRANCH_ID),
        ),
    ];

    for (branch_id, name, code, parent) in tree {
        let branch = branches::ActiveModel {
            id: Set(id(branch_id)),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            parent_branch_id: Set(parent.map(id)),
            is_deleted: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = branch.insert(db).await {
            eprintln!("Failed to insert branch {code}: {e}");
        } else {
            println!("  Created branch: {name}");
        }
    }
}

/// Seeds the system permissions and a registrar role carrying the
/// view-all-branches override.
async fn seed_permissions(db: &DatabaseConnection) {
    let slugs = [
        (CROSS_BRANCH_ACCESS, "Read and write across all branches"),
        (MANAGE_ALL_BRANCHES, "Manage every branch"),
        (VIEW_ALL_BRANCHES, "Read-only access to every branch"),
    ];

    let mut permission_ids = Vec::new();
    for (slug, description) in slugs {
        let permission_id = Uuid::new_v4();
        let permission = permissions::ActiveModel {
            id: Set(permission_id),
            slug: Set(slug.to_string()),
            description: Set(Some(description.to_string())),
        };
        match permission.insert(db).await {
            Ok(_) => {
                println!("  Created permission: {slug}");
                permission_ids.push((slug, permission_id));
            }
            Err(e) => eprintln!("Failed to insert permission {slug}: {e}"),
        }
    }

    let registrar_id = Uuid::new_v4();
    let registrar = roles::ActiveModel {
        id: Set(registrar_id),
        name: Set("registrar".to_string()),
        description: Set(Some("Central registrar with read access everywhere".to_string())),
        created_at: Set(Utc::now().into()),
    };
    if registrar.insert(db).await.is_ok() {
        println!("  Created role: registrar");
        if let Some((_, view_all)) = permission_ids
            .iter()
            .find(|(slug, _)| *slug == VIEW_ALL_BRANCHES)
        {
            let grant = role_permissions::ActiveModel {
                role_id: Set(registrar_id),
                permission_id: Set(*view_all),
            };
            let _ = grant.insert(db).await;
        }
        let assignment = user_roles::ActiveModel {
            user_id: Set(id(ACCOUNTANT_ID)),
            role_id: Set(registrar_id),
        };
        if let Err(e) = assignment.insert(db).await {
            eprintln!("Failed to assign registrar role: {e}");
        }
    }
}

/// Seeds one user per interesting access shape.
async fn seed_users(db: &DatabaseConnection) {
    let password_hash = hash_password("password123").expect("failed to hash seed password");
    let now = Utc::now();

    let accounts = [
        (
            SUPER_ADMIN_ID,
            "admin@sekolah.dev",
            "Super Admin",
            UserRole::SuperAdmin,
            None,
        ),
        (
            BRANCH_ADMIN_ID,
            "north.admin@sekolah.dev",
            "North Campus Admin",
            UserRole::BranchAdmin,
            Some(NORTH_BRANCH_ID),
        ),
        (
            ACCOUNTANT_ID,
            "registrar@sekolah.dev",
            "Central Registrar",
            UserRole::Accountant,
            Some(ROOT_BRANCH_ID),
        ),
    ];

    for (user_id, email, name, role, branch) in accounts {
        let user = users::ActiveModel {
            id: Set(id(user_id)),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.clone()),
            full_name: Set(name.to_string()),
            role: Set(role),
            branch_id: Set(branch.map(id)),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {email}: {e}");
        } else {
            println!("  Created user: {email}");
        }
    }
}

/// Seeds fee structures for the north campus plus sample dues and one
/// partially allocated payment for the sample student.
async fn seed_fees(db: &DatabaseConnection) {
    let now = Utc::now();
    let year = "2026/2027";

    let tuition_id = Uuid::new_v4();
    let transport_id = Uuid::new_v4();
    let structures = [
        (tuition_id, "tuition", Decimal::new(1_000_000, 2)),
        (transport_id, "transport", Decimal::new(150_000, 2)),
    ];

    for (structure_id, fee_type, amount) in structures {
        let structure = fee_structures::ActiveModel {
            id: Set(structure_id),
            branch_id: Set(id(NORTH_BRANCH_ID)),
            grade: Set("7".to_string()),
            fee_type: Set(fee_type.to_string()),
            amount: Set(amount),
            academic_year: Set(year.to_string()),
            due_date: Set(NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()),
            recurrence: Set(FeeRecurrence::Annual),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = structure.insert(db).await {
            eprintln!("Failed to insert fee structure {fee_type}: {e}");
        } else {
            println!("  Created fee structure: {fee_type}");
        }
    }

    let dues = [
        // Current-year tuition, untouched.
        (tuition_id, "tuition", Decimal::new(1_000_000, 2), 2026, 9),
        // Transport from last term, already overdue.
        (transport_id, "transport", Decimal::new(150_000, 2), 2026, 3),
    ];

    for (structure_id, fee_type, amount, due_year, due_month) in dues {
        let due = fee_dues::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(id(STUDENT_ID)),
            fee_structure_id: Set(structure_id),
            fee_type: Set(fee_type.to_string()),
            academic_year: Set(year.to_string()),
            current_grade: Set(Some("7".to_string())),
            due_date: Set(NaiveDate::from_ymd_opt(due_year, due_month, 15).unwrap()),
            original_amount: Set(amount),
            balance_amount: Set(amount),
            status: Set(DueStatus::Pending),
            metadata: Set(serde_json::json!({})),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = due.insert(db).await {
            eprintln!("Failed to insert fee due {fee_type}: {e}");
        } else {
            println!("  Created fee due: {fee_type}");
        }
    }

    let payment = fee_payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(id(STUDENT_ID)),
        fee_structure_id: Set(Some(tuition_id)),
        amount_paid: Set(Decimal::new(400_000, 2)),
        discount_amount: Set(Decimal::ZERO),
        late_fee: Set(Decimal::ZERO),
        total_amount: Set(Decimal::new(400_000, 2)),
        payment_date: Set(now.date_naive()),
        payment_status: Set(PaymentStatus::Completed),
        payment_method: Set("bank_transfer".to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    if let Err(e) = payment.insert(db).await {
        eprintln!("Failed to insert sample payment: {e}");
    } else {
        println!("  Created sample payment (unallocated, 4000.00)");
    }
}
