use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(
                        ColumnDef::new(Clients::CreditLimit)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Clients::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Clients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Establishments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Establishments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Establishments::Name).string().not_null())
                    .col(ColumnDef::new(Establishments::AdminId).uuid().not_null())
                    .col(ColumnDef::new(Establishments::LateFeeRuleId).uuid().null())
                    .col(
                        ColumnDef::new(Establishments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Establishments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LateFeeRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LateFeeRules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LateFeeRules::EstablishmentId).uuid().null())
                    .col(
                        ColumnDef::new(LateFeeRules::DaysOverdueMin)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LateFeeRules::DaysOverdueMax)
                            .integer()
                            .not_null()
                            .check(
                                Expr::col(LateFeeRules::DaysOverdueMax)
                                    .gt(Expr::col(LateFeeRules::DaysOverdueMin)),
                            ),
                    )
                    .col(ColumnDef::new(LateFeeRules::FeeType).string().not_null())
                    .col(
                        ColumnDef::new(LateFeeRules::FeeValue)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LateFeeRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_late_fee_rules_establishment")
                            .from(LateFeeRules::Table, LateFeeRules::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::EstablishmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditAccounts::ClientId).uuid().null())
                    .col(
                        ColumnDef::new(CreditAccounts::CreditLimit)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::CurrentBalance)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::MonthlyDueDay)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::InterestRate)
                            .decimal_len(9, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::InterestType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditAccounts::CreditType).string().not_null())
                    .col(
                        ColumnDef::new(CreditAccounts::GracePeriodMonths)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::IsBlocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::LastInterestAccrualAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditAccounts::LateFeeRuleId).uuid().null())
                    .col(
                        ColumnDef::new(CreditAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_accounts_client")
                            .from(CreditAccounts::Table, CreditAccounts::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_accounts_establishment")
                            .from(CreditAccounts::Table, CreditAccounts::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_accounts_late_fee_rule")
                            .from(CreditAccounts::Table, CreditAccounts::LateFeeRuleId)
                            .to(LateFeeRules::Table, LateFeeRules::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One account per (client, establishment) pair, enforced in storage
        // so the pre-insert existence check cannot race.
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_accounts_client_establishment")
                    .table(CreditAccounts::Table)
                    .col(CreditAccounts::ClientId)
                    .col(CreditAccounts::EstablishmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::CreditAccountId).uuid().null())
                    .col(
                        ColumnDef::new(Transactions::TransactionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::RecipientType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::RecipientId).uuid().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Description).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_credit_account")
                            .from(Transactions::Table, Transactions::CreditAccountId)
                            .to(CreditAccounts::Table, CreditAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_credit_account")
                    .table(Transactions::Table)
                    .col(Transactions::CreditAccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditAccountHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditAccountHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditAccountHistory::CreditAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccountHistory::TransactionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccountHistory::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccountHistory::Balance)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccountHistory::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditAccountHistory::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_history_credit_account")
                            .from(
                                CreditAccountHistory::Table,
                                CreditAccountHistory::CreditAccountId,
                            )
                            .to(CreditAccounts::Table, CreditAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_history_credit_account")
                    .table(CreditAccountHistory::Table)
                    .col(CreditAccountHistory::CreditAccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LateFees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LateFees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(LateFees::CreditAccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(LateFees::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LateFees::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_late_fees_credit_account")
                            .from(LateFees::Table, LateFees::CreditAccountId)
                            .to(CreditAccounts::Table, CreditAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditRequests::ClientId).uuid().not_null())
                    .col(
                        ColumnDef::new(CreditRequests::EstablishmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::RequestedCreditLimit)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::MonthlyDueDay)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::InterestRate)
                            .decimal_len(9, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::InterestType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditRequests::CreditType).string().not_null())
                    .col(
                        ColumnDef::new(CreditRequests::GracePeriodMonths)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CreditRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(CreditRequests::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::RejectedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_requests_client")
                            .from(CreditRequests::Table, CreditRequests::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_requests_establishment")
                            .from(CreditRequests::Table, CreditRequests::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Installments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Installments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Installments::CreditAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Installments::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(Installments::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Installments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Installments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installments_credit_account")
                            .from(Installments::Table, Installments::CreditAccountId)
                            .to(CreditAccounts::Table, CreditAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Installments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LateFees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditAccountHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LateFeeRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Establishments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    CreditLimit,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Establishments {
    Table,
    Id,
    Name,
    AdminId,
    LateFeeRuleId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LateFeeRules {
    Table,
    Id,
    EstablishmentId,
    DaysOverdueMin,
    DaysOverdueMax,
    FeeType,
    FeeValue,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CreditAccounts {
    Table,
    Id,
    EstablishmentId,
    ClientId,
    CreditLimit,
    CurrentBalance,
    MonthlyDueDay,
    InterestRate,
    InterestType,
    CreditType,
    GracePeriodMonths,
    IsBlocked,
    LastInterestAccrualAt,
    LateFeeRuleId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    CreditAccountId,
    TransactionType,
    RecipientType,
    RecipientId,
    Amount,
    Description,
    OccurredAt,
}

#[derive(DeriveIden)]
enum CreditAccountHistory {
    Table,
    Id,
    CreditAccountId,
    TransactionType,
    Amount,
    Balance,
    Description,
    OccurredAt,
}

#[derive(DeriveIden)]
enum LateFees {
    Table,
    Id,
    CreditAccountId,
    Amount,
    AppliedAt,
}

#[derive(DeriveIden)]
enum CreditRequests {
    Table,
    Id,
    ClientId,
    EstablishmentId,
    RequestedCreditLimit,
    MonthlyDueDay,
    InterestRate,
    InterestType,
    CreditType,
    GracePeriodMonths,
    Status,
    ApprovedAt,
    RejectedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Installments {
    Table,
    Id,
    CreditAccountId,
    DueDate,
    Amount,
    Status,
    CreatedAt,
}
