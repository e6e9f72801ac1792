//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication and profile
//! - `groups`: expense groups owned by users
//! - `participants`: group roster, optionally linked to a user
//! - `expenses`: shared expenses with payer and split mode
//! - `shares`: owed portion per (expense, participant)
//! - `personal_expenses`: per-user spending outside any group
//! - `monthly_budgets`: one budget row per (user, year, month)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    PasswordDigest,
    DisplayName,
    ResetCode,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    Description,
    CreatedBy,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    GroupId,
    Name,
    UserId,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    GroupId,
    Title,
    AmountMinor,
    OccurredOn,
    PayerId,
    SplitMode,
}

#[derive(Iden)]
enum Shares {
    Table,
    Id,
    ExpenseId,
    ParticipantId,
    AmountMinor,
}

#[derive(Iden)]
enum PersonalExpenses {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Category,
    OccurredAt,
}

#[derive(Iden)]
enum MonthlyBudgets {
    Table,
    UserId,
    Year,
    Month,
    AmountMinor,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordDigest).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string())
                    .col(ColumnDef::new(Users::ResetCode).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Groups
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::Description).string())
                    .col(ColumnDef::new(Groups::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_created_by")
                            .from(Groups::Table, Groups::CreatedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Participants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::GroupId).string().not_null())
                    .col(ColumnDef::new(Participants::Name).string().not_null())
                    .col(ColumnDef::new(Participants::UserId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_group")
                            .from(Participants::Table, Participants::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_user")
                            .from(Participants::Table, Participants::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_group_id")
                    .table(Participants::Table)
                    .col(Participants::GroupId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::GroupId).string().not_null())
                    .col(ColumnDef::new(Expenses::Title).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Expenses::PayerId).string().not_null())
                    .col(ColumnDef::new(Expenses::SplitMode).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_group")
                            .from(Expenses::Table, Expenses::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_payer")
                            .from(Expenses::Table, Expenses::PayerId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expenses_group_id")
                    .table(Expenses::Table)
                    .col(Expenses::GroupId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Shares
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Shares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shares::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shares::ExpenseId).string().not_null())
                    .col(ColumnDef::new(Shares::ParticipantId).string().not_null())
                    .col(
                        ColumnDef::new(Shares::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shares_expense")
                            .from(Shares::Table, Shares::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shares_participant")
                            .from(Shares::Table, Shares::ParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shares_expense_id")
                    .table(Shares::Table)
                    .col(Shares::ExpenseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shares_participant_id")
                    .table(Shares::Table)
                    .col(Shares::ParticipantId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Personal expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PersonalExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonalExpenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PersonalExpenses::UserId).string().not_null())
                    .col(ColumnDef::new(PersonalExpenses::Title).string().not_null())
                    .col(
                        ColumnDef::new(PersonalExpenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonalExpenses::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PersonalExpenses::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_personal_expenses_user")
                            .from(PersonalExpenses::Table, PersonalExpenses::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_personal_expenses_user_id")
                    .table(PersonalExpenses::Table)
                    .col(PersonalExpenses::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Monthly budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MonthlyBudgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyBudgets::UserId).string().not_null())
                    .col(ColumnDef::new(MonthlyBudgets::Year).integer().not_null())
                    .col(ColumnDef::new(MonthlyBudgets::Month).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyBudgets::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MonthlyBudgets::UserId)
                            .col(MonthlyBudgets::Year)
                            .col(MonthlyBudgets::Month),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_budgets_user")
                            .from(MonthlyBudgets::Table, MonthlyBudgets::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyBudgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PersonalExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
