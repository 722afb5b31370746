pub mod class;
pub mod header;
pub mod packet;
pub mod question;
pub mod record_type;
pub mod resource_record;
pub mod response_code;
