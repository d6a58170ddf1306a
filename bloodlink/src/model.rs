mod blogs;
mod donation_requests;
mod payments;
mod users;

pub use blogs::{Blog, BlogStatus, NewBlog};
pub use donation_requests::{DonationRequest, NewDonationRequest, RecipientDetails, RequestEdit};
pub use payments::{FundraiserPayment, NewPayment};
pub use users::{NewUser, User, UserAuth};
