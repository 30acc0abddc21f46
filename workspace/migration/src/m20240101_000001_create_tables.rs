use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_auto(Students::Id))
                    .col(string(Students::AdmissionNumber).unique_key())
                    .col(string(Students::Name))
                    .col(integer_null(Students::Age))
                    .col(string_null(Students::Class))
                    .col(string_null(Students::GuardianName))
                    .col(string_null(Students::GuardianContacts))
                    .col(string_null(Students::GuardianEmail))
                    .col(string_null(Students::Address))
                    .col(boolean(Students::HasMedicalCondition).default(false))
                    .col(string_null(Students::MedicalConditions))
                    .col(string_null(Students::Allergies))
                    .col(string_null(Students::Medications))
                    .col(string_null(Students::BloodType))
                    .col(string_null(Students::EmergencyContactName))
                    .col(string_null(Students::EmergencyContactRelation))
                    .col(string_null(Students::EmergencyContactPhone))
                    .to_owned(),
            )
            .await?;

        // Create teachers table
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(pk_auto(Teachers::Id))
                    .col(string(Teachers::Name))
                    .col(string_null(Teachers::Email))
                    .col(string_null(Teachers::Phone))
                    .col(string_null(Teachers::Qualification))
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(pk_auto(Subjects::Id))
                    .col(string(Subjects::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create classes table
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(pk_auto(Classes::Id))
                    .col(string(Classes::Name).unique_key())
                    .col(integer_null(Classes::TeacherId))
                    .col(string_null(Classes::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_classes_teacher")
                            .from(Classes::Table, Classes::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create fee_structures table
        manager
            .create_table(
                Table::create()
                    .table(FeeStructures::Table)
                    .if_not_exists()
                    .col(pk_auto(FeeStructures::Id))
                    .col(string(FeeStructures::Class))
                    .col(string(FeeStructures::Term))
                    .col(integer(FeeStructures::Year))
                    .col(decimal(FeeStructures::Amount).decimal_len(16, 4))
                    .col(string_null(FeeStructures::Description))
                    .col(string_null(FeeStructures::DueDate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_structures_class_term_year")
                    .table(FeeStructures::Table)
                    .col(FeeStructures::Class)
                    .col(FeeStructures::Term)
                    .col(FeeStructures::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create fee_payments table
        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .col(pk_auto(FeePayments::Id))
                    .col(integer(FeePayments::StudentId))
                    .col(integer(FeePayments::FeeStructureId))
                    .col(decimal(FeePayments::AmountPaid).decimal_len(16, 4))
                    .col(date(FeePayments::DatePaid))
                    .col(string(FeePayments::ReceiptNumber).unique_key())
                    .col(string(FeePayments::PaymentMethod).default("Cash"))
                    .col(string_null(FeePayments::Remarks))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_payments_student")
                            .from(FeePayments::Table, FeePayments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_payments_fee_structure")
                            .from(FeePayments::Table, FeePayments::FeeStructureId)
                            .to(FeeStructures::Table, FeeStructures::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attendance table
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(pk_auto(Attendance::Id))
                    .col(integer(Attendance::StudentId))
                    .col(date(Attendance::Date))
                    .col(string_len(Attendance::Status, 10))
                    .col(string_null(Attendance::Remarks))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_student")
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_student_date")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create grades table
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(pk_auto(Grades::Id))
                    .col(integer(Grades::StudentId))
                    .col(string(Grades::Subject))
                    .col(string(Grades::Term))
                    .col(integer(Grades::Year))
                    .col(decimal(Grades::Score).decimal_len(6, 2))
                    .col(string_len(Grades::Grade, 1))
                    .col(string_null(Grades::Remarks))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grades_student")
                            .from(Grades::Table, Grades::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create timetable table
        manager
            .create_table(
                Table::create()
                    .table(Timetable::Table)
                    .if_not_exists()
                    .col(pk_auto(Timetable::Id))
                    .col(string(Timetable::Class))
                    .col(string_len(Timetable::Day, 10))
                    .col(integer(Timetable::Period))
                    .col(string(Timetable::Subject))
                    .col(integer_null(Timetable::TeacherId))
                    .col(string_null(Timetable::Room))
                    .col(string_null(Timetable::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timetable_teacher")
                            .from(Timetable::Table, Timetable::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create grading_system table
        manager
            .create_table(
                Table::create()
                    .table(GradingSystem::Table)
                    .if_not_exists()
                    .col(pk_auto(GradingSystem::Id))
                    .col(string(GradingSystem::Name).unique_key())
                    .col(integer(GradingSystem::MinA))
                    .col(integer(GradingSystem::MaxA))
                    .col(integer(GradingSystem::MinB))
                    .col(integer(GradingSystem::MaxB))
                    .col(integer(GradingSystem::MinC))
                    .col(integer(GradingSystem::MaxC))
                    .col(integer(GradingSystem::MinD))
                    .col(integer(GradingSystem::MaxD))
                    .col(integer(GradingSystem::MinF))
                    .col(integer(GradingSystem::MaxF))
                    .col(boolean(GradingSystem::IsDefault).default(false))
                    .to_owned(),
            )
            .await?;

        // Create school_settings table
        manager
            .create_table(
                Table::create()
                    .table(SchoolSettings::Table)
                    .if_not_exists()
                    .col(integer(SchoolSettings::Id).primary_key())
                    .col(string(SchoolSettings::SchoolName))
                    .col(string_null(SchoolSettings::SchoolAddress))
                    .col(string_null(SchoolSettings::SchoolPhone))
                    .col(string_null(SchoolSettings::SchoolEmail))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(SchoolSettings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GradingSystem::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Timetable::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FeePayments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FeeStructures::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    AdmissionNumber,
    Name,
    Age,
    Class,
    GuardianName,
    GuardianContacts,
    GuardianEmail,
    Address,
    HasMedicalCondition,
    MedicalConditions,
    Allergies,
    Medications,
    BloodType,
    EmergencyContactName,
    EmergencyContactRelation,
    EmergencyContactPhone,
}

#[derive(DeriveIden)]
enum Teachers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Qualification,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    Id,
    Name,
    TeacherId,
    Description,
}

#[derive(DeriveIden)]
enum FeeStructures {
    Table,
    Id,
    Class,
    Term,
    Year,
    Amount,
    Description,
    DueDate,
}

#[derive(DeriveIden)]
enum FeePayments {
    Table,
    Id,
    StudentId,
    FeeStructureId,
    AmountPaid,
    DatePaid,
    ReceiptNumber,
    PaymentMethod,
    Remarks,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    StudentId,
    Date,
    Status,
    Remarks,
}

#[derive(DeriveIden)]
enum Grades {
    Table,
    Id,
    StudentId,
    Subject,
    Term,
    Year,
    Score,
    Grade,
    Remarks,
}

#[derive(DeriveIden)]
enum Timetable {
    Table,
    Id,
    Class,
    Day,
    Period,
    Subject,
    TeacherId,
    Room,
    Description,
}

#[derive(DeriveIden)]
enum GradingSystem {
    Table,
    Id,
    Name,
    MinA,
    MaxA,
    MinB,
    MaxB,
    MinC,
    MaxC,
    MinD,
    MaxD,
    MinF,
    MaxF,
    IsDefault,
}

#[derive(DeriveIden)]
enum SchoolSettings {
    Table,
    Id,
    SchoolName,
    SchoolAddress,
    SchoolPhone,
    SchoolEmail,
}
