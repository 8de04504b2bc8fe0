//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod contract;
pub mod group_student;
pub mod lead;
pub mod lesson;
pub mod payment;
pub mod product;
pub mod student;
pub mod students_group;
pub mod teacher;
pub mod teacher_payment;
pub mod user;

// Re-export specific types to avoid conflicts
pub use contract::{Column as ContractColumn, Entity as Contract, Model as ContractModel};
pub use group_student::{
    Column as GroupStudentColumn, Entity as GroupStudent, Model as GroupStudentModel,
};
pub use lead::{Column as LeadColumn, Entity as Lead, Model as LeadModel};
pub use lesson::{Column as LessonColumn, Entity as Lesson, Model as LessonModel};
pub use payment::{
    Column as PaymentColumn, Entity as Payment, Model as PaymentModel, PaymentMethod,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use student::{
    Column as StudentColumn, Entity as Student, Model as StudentModel, StudentStatus,
};
pub use students_group::{
    Column as StudentsGroupColumn, Entity as StudentsGroup, Model as StudentsGroupModel,
};
pub use teacher::{
    Column as TeacherColumn, Entity as Teacher, Model as TeacherModel, TeacherStatus,
};
pub use teacher_payment::{
    Column as TeacherPaymentColumn, Entity as TeacherPayment, Model as TeacherPaymentModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
