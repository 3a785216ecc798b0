// ABOUTME: Compile-fail test verifying PoolName and MemberArn are not interchangeable.
// ABOUTME: This test should fail to compile, validating type safety.

use stackswap::types::{MemberArn, PoolName};

fn takes_member(_id: MemberArn) {}

fn main() {
    let pool = PoolName::new("asg-B");
    takes_member(pool); // ERROR: expected MemberArn, found PoolName
}
