/*
[INPUT]:  Solidity signatures of the ERC-721 Enumerable view functions
[OUTPUT]: Typed call structs with ABI encoding/decoding
[POS]:    Contract layer - ABI definitions via alloy's sol! macro
[UPDATE]: When reading additional contract functions
*/

use alloy_sol_types::sol;

sol! {
    /// View functions of an ERC-721 collection with the Enumerable and Metadata extensions
    interface IERC721Enumerable {
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);

        /// Revert raised by OpenZeppelin v5 for unknown token ids
        error ERC721NonexistentToken(uint256 tokenId);
    }
}
